use super::DatabaseConfig;
use crate::StorefrontError as Error;

impl DatabaseConfig {
    /// Create / Connect to the Database
    ///
    /// Supported formats:
    ///
    /// - `:memory:` - In-Memory SQLite Database, not persisted
    /// - `./path/to/database.db` - Relative path to SQLite database
    /// - `/path/to/database.db` - Absolute path to SQLite database
    /// - `libsql://host` - Remote libsql database (requires a token)
    ///
    pub async fn database(&self) -> Result<libsql::Database, Error> {
        match self.path.as_deref() {
            None | Some(":memory:") => {
                log::info!("Connecting to In-Memory Database");
                log::warn!("In-Memory Database is not persisted and will be lost on restart");

                Ok(libsql::Builder::new_local(":memory:").build().await?)
            }
            Some(path) if path.starts_with("libsql:") => {
                let token = self.token.clone().ok_or_else(|| {
                    Error::ConfigParseError("libsql database requires a token".to_string())
                })?;

                Ok(libsql::Builder::new_remote(path.to_string(), token)
                    .build()
                    .await?)
            }
            Some(path)
                if path.starts_with("/") || path.starts_with("./") || path.starts_with("\\") =>
            {
                log::info!("Connecting to Database: {:?}", path);
                let dirpath = std::path::Path::new(path);
                if let Some(parent) = dirpath.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                Ok(libsql::Builder::new_local(path).build().await?)
            }
            Some(path) => Err(Error::ConfigParseError(format!(
                "Invalid database path: {}",
                path
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database() -> Result<(), Error> {
        let config = DatabaseConfig {
            path: Some(":memory:".to_string()),
            ..Default::default()
        };

        let database = config.database().await?;
        let _conn = database.connect()?;

        Ok(())
    }

    #[tokio::test]
    async fn test_file_database() -> Result<(), Error> {
        let path = std::env::temp_dir().join("storefront-test").join("storefront.db");
        let config = DatabaseConfig {
            path: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };
        assert_eq!(config.backend(), "sqlite");

        let database = config.database().await?;
        let _conn = database.connect()?;

        assert!(std::fs::metadata(&path)?.is_file());

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_path() {
        let config = DatabaseConfig {
            path: Some("storefront.db".to_string()),
            ..Default::default()
        };
        assert!(config.database().await.is_err());
    }

    #[tokio::test]
    async fn test_remote_requires_token() {
        let config = DatabaseConfig {
            path: Some("libsql://db.example.com".to_string()),
            token: None,
        };
        assert_eq!(config.backend(), "libsql");
        assert!(config.database().await.is_err());
    }
}
