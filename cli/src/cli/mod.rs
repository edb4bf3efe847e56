use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use storefront::{Config, STOREFRONT_BANNER, STOREFRONT_VERSION};

pub mod database;
pub mod health;
pub mod reconcile;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Enable Debugging
    #[clap(long, env, default_value_t = false)]
    pub debug: bool,

    /// Disable Banner
    #[clap(long, default_value_t = false)]
    pub disable_banner: bool,

    /// Configuration file path
    #[clap(short, long, env = "STOREFRONT_CONFIG", default_value = "./storefront.yml")]
    pub config: PathBuf,

    /// Database URL (SQLite / libsql)
    #[clap(long, env = "STOREFRONT_DB_URL")]
    pub database_url: Option<String>,

    /// Subcommands
    #[clap(subcommand)]
    pub commands: ArgumentCommands,
}

impl Arguments {
    /// Load the configuration file and apply the command line overrides
    ///
    /// A missing file falls back to the defaults, a malformed one is an error.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)
            .with_context(|| format!("Failed to load configuration: {}", self.config.display()))?;
        if let Some(url) = &self.database_url {
            config.database.path = Some(url.clone());
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArgumentCommands {
    /// Database management
    Database {
        #[clap(subcommand)]
        subcommands: database::DatabaseCommands,
    },
    /// Run a single health probe and print the status
    Health {
        /// Run the readiness probe instead of the liveness probe
        #[clap(long)]
        ready: bool,
        /// Probe timeout in milliseconds (overrides the configuration)
        #[clap(long)]
        timeout: Option<u64>,
    },
    /// Reconcile category images with a list of known-good asset paths
    Reconcile {
        /// Mappings file (YAML or JSON), defaults to `reconcile.mappings`
        mappings: Option<PathBuf>,
        /// Asset root directory every image path must exist in
        #[clap(long, env = "STOREFRONT_RECONCILE_ASSETS")]
        assets: Option<PathBuf>,
        /// Only report what would change
        #[clap(long)]
        dry_run: bool,
        /// Do not ask for confirmation
        #[clap(short, long)]
        yes: bool,
    },
}

pub fn init() -> Arguments {
    dotenvy::dotenv().ok();

    let arguments = Arguments::parse();

    let log_level = match &arguments.debug {
        false => log::LevelFilter::Info,
        true => log::LevelFilter::Debug,
    };

    env_logger::builder()
        .parse_default_env()
        .format_module_path(false)
        .filter_level(log_level)
        .init();

    if !arguments.disable_banner {
        println!(
            "{}    by {} - v{}\n",
            style(STOREFRONT_BANNER).green(),
            style(AUTHOR).red(),
            style(STOREFRONT_VERSION).blue()
        );
    }

    arguments
}
