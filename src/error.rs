//! # Storefront Error
use std::time::Duration;

use thiserror::Error;

/// Storefront Error
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Parsing Configuration Error
    #[error("Failed to parse the configuration file: {0}")]
    ConfigParseError(String),
    /// Required configuration is missing
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
    /// IO Error
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    /// Yaml Error
    #[error("YAML Error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    /// JSON Error
    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Figment Error
    #[error("Figment Error: {0}")]
    FigmentError(#[from] figment::Error),

    /// The database could not be reached
    #[error("Database connectivity failure ({backend}): {error}")]
    ConnectivityFailure {
        /// Database backend
        backend: String,
        /// Underlying error message
        error: String,
    },
    /// A query failed against a reachable database
    #[error("Database query failure: {0}")]
    QueryFailure(String),
    /// No row matched the identifier
    #[error("{table} {id} not found")]
    NotFound {
        /// Table name
        table: &'static str,
        /// Row identifier
        id: i64,
    },
    /// The database did not answer in time
    #[error("Database did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Referenced asset does not exist
    #[error("Asset not found: {0}")]
    MissingAsset(String),
    /// Invalid Data
    #[error("Invalid Data: {0}")]
    InvalidData(String),

    /// GeekORM Error
    #[cfg(feature = "models")]
    #[error("{0}")]
    GeekOrm(#[from] geekorm::Error),

    /// Libsql Error
    #[cfg(feature = "models")]
    #[error("{0}")]
    Libsql(#[from] libsql::Error),

    /// Unknown Error
    #[error("Unknown Error: {0}")]
    UnknownError(String),
}

/// Broad classification of a [StorefrontError]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Database unreachable
    Connectivity,
    /// Query failed against a reachable database
    Query,
    /// Target row does not exist
    NotFound,
    /// Database did not answer in time
    Timeout,
    /// Referenced asset does not exist
    MissingAsset,
    /// Anything else
    Other,
}

impl StorefrontError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorefrontError::ConnectivityFailure { .. } => ErrorKind::Connectivity,
            StorefrontError::QueryFailure(_) => ErrorKind::Query,
            StorefrontError::NotFound { .. } => ErrorKind::NotFound,
            StorefrontError::Timeout(_) => ErrorKind::Timeout,
            StorefrontError::MissingAsset(_) => ErrorKind::MissingAsset,
            #[cfg(feature = "models")]
            StorefrontError::GeekOrm(geekorm::Error::NoRowsFound { .. }) => ErrorKind::NotFound,
            #[cfg(feature = "models")]
            StorefrontError::GeekOrm(_) | StorefrontError::Libsql(_) => ErrorKind::Query,
            _ => ErrorKind::Other,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Query => "query",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MissingAsset => "missing-asset",
            ErrorKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}
