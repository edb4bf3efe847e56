use anyhow::Result;
use clap::Subcommand;
use log::info;
use storefront::{Config, Database, models::Users};

#[derive(Subcommand, Debug, Clone)]
pub enum DatabaseCommands {
    /// Create the tables
    Create {},
    /// Create a new active user
    #[clap(visible_alias = "create-user")]
    User {
        /// Email address (prompted for when missing)
        #[clap(long)]
        email: Option<String>,
    },
}

pub async fn run(config: &Config, subcommands: DatabaseCommands) -> Result<()> {
    config.database.persistent()?;
    let database = Database::open(&config.database).await?;
    info!("Connected!");

    let result = match subcommands {
        DatabaseCommands::Create {} => database.create().await.map_err(Into::into),
        DatabaseCommands::User { email } => create_user(&database, email).await,
    };

    database.close();
    result
}

async fn create_user(database: &Database, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => crate::utils::interactive::prompt_input("Email")?,
    };

    let user = Users::create(database.connection(), email).await?;
    info!("User created: {:?}", user);
    Ok(())
}
