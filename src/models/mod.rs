//! # Storefront Models

use geekorm::prelude::*;
use log::debug;

pub mod categories;
pub mod users;

pub use categories::Categories;
pub use users::{UserState, Users};

use crate::StorefrontError;

/// Initialize the database with the necessary tables.
pub async fn database_create<'a, T>(connection: &'a T) -> Result<(), StorefrontError>
where
    T: GeekConnection<Connection = T> + 'a,
{
    debug!("Creating tables");

    debug!("Creating Users table");
    Users::create_table(connection).await?;

    debug!("Creating Categories table");
    Categories::create_table(connection).await?;

    Ok(())
}
