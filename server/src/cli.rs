use clap::Parser;
use console::style;
use log::info;
use std::path::PathBuf;
use storefront::{Config, STOREFRONT_BANNER, STOREFRONT_VERSION, StorefrontError};

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Enable debug mode
    #[clap(long, default_value_t = false)]
    pub debug: bool,

    /// Disable the banner
    #[clap(long, default_value_t = false)]
    pub disable_banner: bool,

    /// Path to the configuration file
    #[clap(short, long, env = "STOREFRONT_CONFIG", default_value = "config/storefront.yml")]
    pub config: PathBuf,

    /// Database path or libsql URL (overrides `database.path`)
    #[clap(long, env = "STOREFRONT_DB_URL")]
    pub database_url: Option<String>,

    /// Address to bind to (overrides `server.address`)
    #[clap(long)]
    pub address: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[clap(short, long)]
    pub port: Option<u16>,

    /// Create the database tables on startup
    #[clap(long, env = "STOREFRONT_CREATE_DATABASE", default_value_t = false)]
    pub create_database: bool,

    /// Serve from a fresh in-memory database (development only)
    #[clap(long, default_value_t = false, conflicts_with = "database_url")]
    pub memory: bool,
}

impl Arguments {
    /// Load the configuration file and apply the command line overrides
    ///
    /// Refuses to fall back to an in-memory database unless `--memory` was
    /// passed, as the probes would then report on an empty database.
    pub fn load_config(&self) -> Result<Config, StorefrontError> {
        let mut config = Config::load(&self.config)?;

        if let Some(url) = &self.database_url {
            config.database.path = Some(url.clone());
        }
        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        if self.memory {
            info!("Using an in-memory database");
            config.database.path = Some(":memory:".to_string());
        } else {
            config.database.persistent()?;
        }
        Ok(config)
    }

    /// Tables need creating when asked to, or when nothing else could have
    pub fn create_tables(&self) -> bool {
        self.create_database || self.memory
    }
}

pub fn init() -> Arguments {
    // Load .env before parsing so `env` arguments pick it up
    dotenvy::dotenv().ok();

    let arguments = Arguments::parse();

    env_logger::builder()
        .parse_default_env()
        .filter_level(if arguments.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if !arguments.disable_banner {
        println!(
            "{}    {} - v{}",
            style(STOREFRONT_BANNER).green(),
            style(AUTHOR).red(),
            style(STOREFRONT_VERSION).blue()
        );
    }

    arguments
}
