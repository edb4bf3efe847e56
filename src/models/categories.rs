//! # Category Models
use chrono::{DateTime, Utc};
use geekorm::prelude::*;
use serde::{Deserialize, Serialize};

use crate::StorefrontError;

/// Category Model / Table
#[derive(Table, Debug, Default, Clone, Serialize, Deserialize)]
pub struct Categories {
    /// Primary Key
    #[geekorm(primary_key, auto_increment)]
    pub id: PrimaryKeyInteger,

    /// Category Name
    #[geekorm(unique, not_null)]
    pub name: String,

    /// Denormalised path of the category image asset
    pub image: Option<String>,

    /// Created At
    #[geekorm(new = "Utc::now()")]
    pub created_at: DateTime<Utc>,
}

impl Categories {
    /// Create a new category without an image
    pub async fn create<'a, T>(
        connection: &'a T,
        name: impl Into<String>,
    ) -> Result<Self, geekorm::Error>
    where
        T: GeekConnection<Connection = T> + 'a,
    {
        let mut category = Categories::new(name);
        category.save(connection).await?;
        Ok(category)
    }

    /// Fetch a category by its identifier
    ///
    /// A missing row is reported as [StorefrontError::NotFound].
    pub async fn fetch_category<'a, T>(connection: &'a T, id: i32) -> Result<Self, StorefrontError>
    where
        T: GeekConnection<Connection = T> + 'a,
    {
        match Categories::fetch_by_primary_key(connection, id).await {
            Ok(category) => Ok(category),
            Err(geekorm::Error::NoRowsFound { .. }) => Err(StorefrontError::NotFound {
                table: "Categories",
                id: id.into(),
            }),
            Err(e) => Err(StorefrontError::QueryFailure(e.to_string())),
        }
    }

    /// Overwrite the image path of a category
    pub async fn update_image<'a, T>(
        connection: &'a T,
        id: i32,
        image: impl Into<String>,
    ) -> Result<Self, StorefrontError>
    where
        T: GeekConnection<Connection = T> + 'a,
    {
        let mut category = Categories::fetch_category(connection, id).await?;
        category.image = Some(image.into());
        category
            .update(connection)
            .await
            .map_err(|e| StorefrontError::QueryFailure(e.to_string()))?;

        log::debug!("Updated category `{}` image: {:?}", category.name, category.image);
        Ok(category)
    }
}
