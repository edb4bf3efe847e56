//! # Health Probes
//!
//! Liveness and readiness checks against a [DatabaseGateway].
//!
//! Probes never fail: every error (including a timeout waiting for the
//! database) is converted into the degraded status. Each call is a single
//! attempt, the caller decides on the probing cadence.
//!
//! ```no_run
//! # async fn probe(database: &storefront::Database) {
//! use storefront::Prober;
//!
//! let prober = Prober::new(storefront::STOREFRONT_VERSION);
//! let status = prober.check_liveness(database).await;
//! println!("healthy: {}", status.is_healthy());
//! # }
//! ```
use std::{
    future::Future,
    time::{Duration, Instant},
};

use chrono::Utc;
use log::{debug, warn};

use crate::{
    DatabaseGateway, StorefrontError,
    utils::{config::HealthConfig, process::MemoryStats},
};

mod status;

pub use status::{DatabaseState, HealthStatus, ReadinessStatus};

/// Default time a probe waits for the database
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Liveness / Readiness Prober
#[derive(Debug, Clone)]
pub struct Prober {
    started: Instant,
    version: String,
    timeout: Duration,
}

impl Prober {
    /// Create a new prober, uptime is measured from this point
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            started: Instant::now(),
            version: version.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Create a prober from the health configuration
    pub fn from_config(config: &HealthConfig, version: impl Into<String>) -> Self {
        Self::new(version).with_timeout(config.timeout())
    }

    /// Set the database timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Version tag reported by the liveness probe
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Time since the prober was created
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Liveness check
    ///
    /// Issues a single `SELECT 1` round-trip.
    pub async fn check_liveness<G>(&self, database: &G) -> HealthStatus
    where
        G: DatabaseGateway + ?Sized,
    {
        match self.bounded(database.ping()).await {
            Ok(()) => {
                debug!("Liveness probe succeeded ({})", database.backend());
                HealthStatus::Healthy {
                    timestamp: Utc::now(),
                    uptime: self.uptime().as_secs_f64(),
                    memory: MemoryStats::current(),
                    version: self.version.clone(),
                }
            }
            Err(error) => {
                warn!("Liveness probe failed ({}): {}", database.backend(), error);
                HealthStatus::Unhealthy {
                    error: error.to_string(),
                    timestamp: Utc::now(),
                }
            }
        }
    }

    /// Readiness check
    ///
    /// Counts the active users; zero users is still ready.
    pub async fn check_readiness<G>(&self, database: &G) -> ReadinessStatus
    where
        G: DatabaseGateway + ?Sized,
    {
        match self.bounded(database.count_active_users()).await {
            Ok(users) => {
                debug!("Readiness probe succeeded :: {} active users", users);
                ReadinessStatus::Ready {
                    database: DatabaseState::Connected,
                    users,
                    timestamp: Utc::now(),
                }
            }
            Err(error) => {
                warn!("Readiness probe failed ({}): {}", database.backend(), error);
                ReadinessStatus::NotReady {
                    error: error.to_string(),
                    timestamp: Utc::now(),
                }
            }
        }
    }

    async fn bounded<T, F>(&self, future: F) -> Result<T, StorefrontError>
    where
        F: Future<Output = Result<T, StorefrontError>>,
    {
        match tokio::time::timeout(self.timeout, future).await {
            Ok(result) => result,
            Err(_) => Err(StorefrontError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Gateway whose every operation fails
    struct BrokenDatabase;

    #[async_trait]
    impl DatabaseGateway for BrokenDatabase {
        fn backend(&self) -> &str {
            "broken"
        }
        async fn ping(&self) -> Result<(), StorefrontError> {
            Err(StorefrontError::ConnectivityFailure {
                backend: "broken".to_string(),
                error: "connection refused".to_string(),
            })
        }
        async fn count_active_users(&self) -> Result<i64, StorefrontError> {
            Err(StorefrontError::QueryFailure("no such table: Users".to_string()))
        }
        async fn category_image(&self, _: i32) -> Result<Option<String>, StorefrontError> {
            unreachable!()
        }
        async fn set_category_image(&self, _: i32, _: &str) -> Result<(), StorefrontError> {
            unreachable!()
        }
    }

    /// Gateway that never answers within the probe timeout
    struct HungDatabase;

    #[async_trait]
    impl DatabaseGateway for HungDatabase {
        fn backend(&self) -> &str {
            "hung"
        }
        async fn ping(&self) -> Result<(), StorefrontError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
        async fn count_active_users(&self) -> Result<i64, StorefrontError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(1)
        }
        async fn category_image(&self, _: i32) -> Result<Option<String>, StorefrontError> {
            unreachable!()
        }
        async fn set_category_image(&self, _: i32, _: &str) -> Result<(), StorefrontError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn liveness_unhealthy() {
        let prober = Prober::new("test");
        let status = prober.check_liveness(&BrokenDatabase).await;

        assert!(!status.is_healthy());
        match status {
            HealthStatus::Unhealthy { error, .. } => {
                assert!(error.contains("connection refused"))
            }
            _ => panic!("expected unhealthy"),
        }
    }

    #[tokio::test]
    async fn readiness_not_ready() {
        let prober = Prober::new("test");
        let status = prober.check_readiness(&BrokenDatabase).await;

        assert!(!status.is_ready());
        assert!(!status.database_connected());
    }

    #[tokio::test]
    async fn probes_time_out() {
        let prober = Prober::new("test").with_timeout(Duration::from_millis(50));

        let started = Instant::now();
        let liveness = prober.check_liveness(&HungDatabase).await;
        let readiness = prober.check_readiness(&HungDatabase).await;

        assert!(!liveness.is_healthy());
        assert!(!readiness.is_ready());
        assert!(started.elapsed() < Duration::from_secs(10));
        match liveness {
            HealthStatus::Unhealthy { error, .. } => assert!(error.contains("50ms")),
            _ => panic!("expected unhealthy"),
        }
    }

    #[tokio::test]
    async fn dyn_gateway() {
        let gateway: std::sync::Arc<dyn DatabaseGateway> = std::sync::Arc::new(BrokenDatabase);
        let prober = Prober::new("test");
        assert!(!prober.check_liveness(gateway.as_ref()).await.is_healthy());
    }

    #[cfg(feature = "models")]
    mod database {
        use super::*;
        use crate::{Database, models::Users};

        #[tokio::test]
        async fn liveness_healthy() -> Result<(), StorefrontError> {
            let database = Database::memory().await?;
            let prober = Prober::new("1.2.3");

            let before = Utc::now();
            let status = prober.check_liveness(&database).await;

            assert!(status.is_healthy());
            assert!(status.timestamp() >= before);
            match status {
                HealthStatus::Healthy { version, uptime, .. } => {
                    assert_eq!(version, "1.2.3");
                    assert!(uptime >= 0.0);
                }
                _ => panic!("expected healthy"),
            }
            Ok(())
        }

        #[tokio::test]
        async fn readiness_zero_users() -> Result<(), StorefrontError> {
            let database = Database::memory().await?;
            database.create().await?;
            let prober = Prober::new("test");

            let status = prober.check_readiness(&database).await;
            assert!(status.is_ready());
            assert_eq!(status.active_user_count(), 0);
            Ok(())
        }

        #[tokio::test]
        async fn readiness_counts_users() -> Result<(), StorefrontError> {
            let database = Database::memory().await?;
            database.create().await?;
            Users::create(database.connection(), "alice@example.com").await?;

            let status = Prober::new("test").check_readiness(&database).await;
            assert_eq!(status.active_user_count(), 1);
            Ok(())
        }

        #[tokio::test]
        async fn readiness_without_schema() -> Result<(), StorefrontError> {
            // Tables have not been created
            let database = Database::memory().await?;
            let status = Prober::new("test").check_readiness(&database).await;
            assert!(!status.is_ready());
            Ok(())
        }
    }
}
