#[macro_use]
extern crate rocket;

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use rocket::{Build, Rocket};
use storefront::{Config, Database, DatabaseGateway, Prober, STOREFRONT_VERSION};

mod api;
mod cli;
mod error;

use error::StorefrontServerError;

/// Application State
pub struct AppState {
    database: Arc<dyn DatabaseGateway>,
    prober: Prober,
}

#[rocket::main]
async fn main() -> Result<()> {
    let arguments = cli::init();

    let config = match arguments.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            return Err(e.into());
        }
    };

    server(config, arguments.create_tables()).await?;

    Ok(())
}

/// Version tag reported by the liveness probe
fn version() -> String {
    let commit = env!("STOREFRONT_GIT_COMMIT");
    if commit.is_empty() {
        STOREFRONT_VERSION.to_string()
    } else {
        format!("{}-{}", STOREFRONT_VERSION, commit)
    }
}

fn rocket(config: &Config, state: AppState) -> Rocket<Build> {
    let rocket_config = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    rocket::custom(rocket_config)
        .manage(state)
        .register("/", api::catchers())
        .mount("/health", api::health::routes())
}

async fn server(config: Config, create: bool) -> Result<(), StorefrontServerError> {
    let database = Database::open(&config.database).await?;
    if create {
        info!("Creating database tables");
        database.create().await?;
    }

    let state = AppState {
        database: Arc::new(database),
        prober: Prober::from_config(&config.health, version()),
    };

    info!("Building Rocket");
    if let Err(e) = rocket(&config, state).launch().await {
        error!("Error launching Rocket: {}", e);
        return Err(e.into());
    }

    info!("Stopping Rocket");
    Ok(())
}
