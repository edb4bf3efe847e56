//! # Storefront Configuration
//!
//! Configuration shared by the Storefront server and CLI.
//!
//! ## Example
//!
//! ```yaml
//! database:
//!   path: /var/lib/storefront/storefront.db
//! server:
//!   address: 0.0.0.0
//!   port: 9000
//! health:
//!   timeout: 2000 # milliseconds
//! reconcile:
//!   mappings: ./config/category-images.yml
//!   assets: ./public
//! ```
//!
//! Every section can be overridden with `STOREFRONT_<SECTION>_<KEY>`
//! environment variables (the database section uses `STOREFRONT_DB_`).

use figment::{Figment, providers::Serialized};
use std::{path::PathBuf, time::Duration};

use crate::StorefrontError;

mod config;
#[cfg(feature = "models")]
mod models;

/// Application Configuration
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,

    /// Database Configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Server Configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Health Probe Configuration
    #[serde(default)]
    pub health: HealthConfig,

    /// Reconciliation Configuration
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

/// Database Configuration
///
/// Settings are loaded from the `STOREFRONT_DB_` environment variables.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatabaseConfig {
    /// Database path. This can be a file path or a connection string.
    ///
    /// When unset the backend is in-memory, which the server and CLI only
    /// accept when asked for explicitly (see [DatabaseConfig::persistent]).
    ///
    /// Env: `STOREFRONT_DB_PATH`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Database auth token for remote libsql databases
    ///
    /// Env: `STOREFRONT_DB_TOKEN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl DatabaseConfig {
    pub(crate) fn figment(base: &Self) -> Figment {
        Figment::from(Serialized::defaults(base))
            .merge(figment::providers::Env::prefixed("STOREFRONT_DB_"))
    }

    /// Name of the backend the path points to
    pub fn backend(&self) -> &'static str {
        match self.path.as_deref() {
            None | Some(":memory:") => "memory",
            Some(path) if path.starts_with("libsql:") => "libsql",
            Some(_) => "sqlite",
        }
    }

    /// Path of a database that outlives this process
    ///
    /// An in-memory database is private to the process which opened it, so
    /// probing or reconciling one never touches the service's data.
    pub fn persistent(&self) -> Result<&str, StorefrontError> {
        match self.path.as_deref() {
            None => Err(StorefrontError::MissingConfiguration(
                "no database path set (`database.path` or `STOREFRONT_DB_PATH`)".to_string(),
            )),
            Some(":memory:") => Err(StorefrontError::MissingConfiguration(
                "database path is `:memory:`, which is private to this process".to_string(),
            )),
            Some(path) => Ok(path),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = if let Ok(p) = std::env::var("STOREFRONT_DB_PATH") {
            Some(p)
        } else if let Ok(data_path) = std::env::var("STOREFRONT_DATA_PATH") {
            let path = PathBuf::from(data_path).join("storefront.db");
            Some(path.to_string_lossy().to_string())
        } else {
            None
        };

        Self { path, token: None }
    }
}

/// Server Configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    ///
    /// Env: `STOREFRONT_SERVER_ADDRESS`
    #[serde(default = "ServerConfig::default_address")]
    pub address: String,

    /// Port
    ///
    /// Env: `STOREFRONT_SERVER_PORT`
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub(crate) fn figment(base: &Self) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Serialized::defaults(base))
            .merge(figment::providers::Env::prefixed("STOREFRONT_SERVER_"))
    }

    fn default_address() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        9000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
        }
    }
}

/// Health Probe Configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthConfig {
    /// Time in milliseconds a probe waits for the database
    ///
    /// Env: `STOREFRONT_HEALTH_TIMEOUT`
    #[serde(default = "HealthConfig::default_timeout")]
    pub timeout: u64,
}

impl HealthConfig {
    pub(crate) fn figment(base: &Self) -> Figment {
        Figment::from(Serialized::defaults(base))
            .merge(figment::providers::Env::prefixed("STOREFRONT_HEALTH_"))
    }

    fn default_timeout() -> u64 {
        2000
    }

    /// Probe timeout as a [Duration]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
        }
    }
}

/// Reconciliation Configuration
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ReconcileConfig {
    /// Path to the category image mappings file (YAML or JSON)
    ///
    /// Env: `STOREFRONT_RECONCILE_MAPPINGS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings: Option<PathBuf>,

    /// Root directory of the stored assets. When set, every image path
    /// must resolve to an existing file below it.
    ///
    /// Env: `STOREFRONT_RECONCILE_ASSETS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<PathBuf>,
}

impl ReconcileConfig {
    pub(crate) fn figment(base: &Self) -> Figment {
        Figment::from(Serialized::defaults(base))
            .merge(figment::providers::Env::prefixed("STOREFRONT_RECONCILE_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn persistent_database() {
        let config = DatabaseConfig {
            path: Some("/var/lib/storefront/storefront.db".to_string()),
            token: None,
        };
        assert_eq!(
            config.persistent().unwrap(),
            "/var/lib/storefront/storefront.db"
        );
    }

    #[test]
    fn unset_path_is_not_persistent() {
        let config = DatabaseConfig {
            path: None,
            token: None,
        };
        assert_eq!(config.backend(), "memory");
        let err = config.persistent().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.to_string().contains("STOREFRONT_DB_PATH"));
    }

    #[test]
    fn memory_is_not_persistent() {
        let config = DatabaseConfig {
            path: Some(":memory:".to_string()),
            token: None,
        };
        assert!(config.persistent().is_err());
    }
}
