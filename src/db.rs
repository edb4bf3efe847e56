//! # Database
//!
//! libsql backed implementation of the [DatabaseGateway].
use async_trait::async_trait;
use log::{debug, info};

use crate::{
    DatabaseGateway, StorefrontError,
    models::{self, Categories, Users},
    utils::config::DatabaseConfig,
};

/// Database handle
///
/// Holds a single libsql connection which is shared by every caller.
pub struct Database {
    backend: String,
    database: libsql::Database,
    connection: libsql::Connection,
}

impl Database {
    /// Open the database described by the configuration
    pub async fn open(config: &DatabaseConfig) -> Result<Self, StorefrontError> {
        let backend = config.backend().to_string();
        let connectivity = |e: StorefrontError| StorefrontError::ConnectivityFailure {
            backend: config.backend().to_string(),
            error: e.to_string(),
        };

        let database = config.database().await.map_err(connectivity)?;
        let connection = database
            .connect()
            .map_err(|e| connectivity(StorefrontError::Libsql(e)))?;

        info!("Connected to `{}` database", backend);
        Ok(Self {
            backend,
            database,
            connection,
        })
    }

    /// Open a fresh in-memory database
    pub async fn memory() -> Result<Self, StorefrontError> {
        Self::open(&DatabaseConfig {
            path: Some(":memory:".to_string()),
            ..Default::default()
        })
        .await
    }

    /// Create the tables
    pub async fn create(&self) -> Result<(), StorefrontError> {
        models::database_create(&self.connection).await
    }

    /// Underlying libsql connection
    pub fn connection(&self) -> &libsql::Connection {
        &self.connection
    }

    /// Close the database, releasing the connection
    pub fn close(self) {
        debug!("Closing `{}` database", self.backend);
        drop(self.connection);
        drop(self.database);
    }
}

#[async_trait]
impl DatabaseGateway for Database {
    fn backend(&self) -> &str {
        self.backend.as_str()
    }

    async fn ping(&self) -> Result<(), StorefrontError> {
        let mut rows = self
            .connection
            .query("SELECT 1", ())
            .await
            .map_err(|e| StorefrontError::QueryFailure(e.to_string()))?;

        match rows.next().await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(StorefrontError::QueryFailure(
                "`SELECT 1` returned no rows".to_string(),
            )),
            Err(e) => Err(StorefrontError::QueryFailure(e.to_string())),
        }
    }

    async fn count_active_users(&self) -> Result<i64, StorefrontError> {
        match Users::count_active(&self.connection).await {
            Ok(count) => Ok(count.max(0)),
            Err(geekorm::Error::NoRowsFound { .. }) => Ok(0),
            Err(e) => Err(StorefrontError::QueryFailure(e.to_string())),
        }
    }

    async fn category_image(&self, category_id: i32) -> Result<Option<String>, StorefrontError> {
        Ok(Categories::fetch_category(&self.connection, category_id)
            .await?
            .image)
    }

    async fn set_category_image(
        &self,
        category_id: i32,
        image_path: &str,
    ) -> Result<(), StorefrontError> {
        Categories::update_image(&self.connection, category_id, image_path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    async fn database() -> Result<Database, StorefrontError> {
        let database = Database::memory().await?;
        database.create().await?;
        Ok(database)
    }

    #[tokio::test]
    async fn ping_memory() -> Result<(), StorefrontError> {
        let database = database().await?;
        assert_eq!(database.backend(), "memory");
        database.ping().await?;
        Ok(())
    }

    #[tokio::test]
    async fn count_active_users() -> Result<(), StorefrontError> {
        let database = database().await?;
        assert_eq!(database.count_active_users().await?, 0);

        Users::create(database.connection(), "alice@example.com").await?;
        let mut bob = Users::create(database.connection(), "bob@example.com").await?;
        bob.disable(database.connection()).await?;

        assert_eq!(database.count_active_users().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn category_images() -> Result<(), StorefrontError> {
        let database = database().await?;

        let shoes = Categories::create(database.connection(), "Shoes").await?;
        let id: i32 = shoes.id.into();

        assert_eq!(database.category_image(id).await?, None);
        database.set_category_image(id, "/images/shoes.jpg").await?;
        assert_eq!(
            database.category_image(id).await?,
            Some("/images/shoes.jpg".to_string())
        );

        let missing = database.set_category_image(999, "/b.jpg").await;
        assert_eq!(missing.unwrap_err().kind(), ErrorKind::NotFound);
        Ok(())
    }
}
