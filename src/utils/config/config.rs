use super::{Config, DatabaseConfig, HealthConfig, ReconcileConfig, ServerConfig};
use crate::error::StorefrontError as Error;
use figment::{Figment, providers::Format};
use log::debug;
use std::path::PathBuf;

impl Config {
    /// Load the Configuration
    pub fn load(path: &PathBuf) -> Result<Self, Error> {
        debug!("Loading Configuration: {:?}", path);

        let figment = Figment::new()
            .merge(figment::providers::Yaml::file(path))
            .merge(figment::providers::Env::prefixed("STOREFRONT_"));

        let mut config = Self::sections(figment)?;
        config.path = path.clone();

        debug!("Finished Loading Configuration");
        Ok(config)
    }

    /// Load the Configuration from a String
    pub fn load_str(data: impl Into<String>) -> Result<Self, Error> {
        let data = data.into();
        debug!("Loading Configuration from str");

        let figment = Figment::new()
            .merge(figment::providers::Yaml::string(&data))
            .merge(figment::providers::Env::prefixed("STOREFRONT_"));

        Self::sections(figment)
    }

    fn sections(figment: Figment) -> Result<Self, Error> {
        let mut config: Self = figment.extract()?;
        config.database = DatabaseConfig::figment(&config.database).extract()?;
        config.server = ServerConfig::figment(&config.server).extract()?;
        config.health = HealthConfig::figment(&config.health).extract()?;
        config.reconcile = ReconcileConfig::figment(&config.reconcile).extract()?;
        Ok(config)
    }

    /// Save the Configuration
    pub fn save(&self, path: &PathBuf) -> Result<(), Error> {
        debug!("Saving Configuration: {:?}", path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let config = serde_yaml::to_string(self)?;
        std::fs::write(path, config)?;
        Ok(())
    }

    /// Config directory path
    pub fn config_path(&self) -> Result<PathBuf, Error> {
        Ok(self
            .path
            .parent()
            .ok_or_else(|| Error::ConfigParseError("Invalid Config Path".to_string()))?
            .to_path_buf())
    }
}
