//! # Probe Statuses
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::process::MemoryStats;

/// Result of a liveness probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    /// The process can reach the database
    Healthy {
        /// Time the probe completed
        timestamp: DateTime<Utc>,
        /// Process uptime in seconds
        uptime: f64,
        /// Process memory usage
        memory: MemoryStats,
        /// Version tag of the running service
        version: String,
    },
    /// The database round-trip failed
    Unhealthy {
        /// Captured error message
        error: String,
        /// Time the probe completed
        timestamp: DateTime<Utc>,
    },
}

impl HealthStatus {
    /// Is the status healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy { .. })
    }

    /// Time the probe completed
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HealthStatus::Healthy { timestamp, .. } | HealthStatus::Unhealthy { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// State of the database as reported by the readiness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseState {
    /// Reachable and answering queries
    Connected,
}

/// Result of a readiness probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ReadinessStatus {
    /// The service can serve traffic
    #[serde(rename = "ready")]
    Ready {
        /// Database state
        database: DatabaseState,
        /// Number of active users
        users: i64,
        /// Time the probe completed
        timestamp: DateTime<Utc>,
    },
    /// The readiness query failed
    #[serde(rename = "not ready")]
    NotReady {
        /// Captured error message
        error: String,
        /// Time the probe completed
        timestamp: DateTime<Utc>,
    },
}

impl ReadinessStatus {
    /// Is the service ready
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessStatus::Ready { .. })
    }

    /// Did the readiness query reach the database
    pub fn database_connected(&self) -> bool {
        self.is_ready()
    }

    /// Number of active users (`0` when not ready)
    pub fn active_user_count(&self) -> i64 {
        match self {
            ReadinessStatus::Ready { users, .. } => *users,
            ReadinessStatus::NotReady { .. } => 0,
        }
    }

    /// Time the probe completed
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ReadinessStatus::Ready { timestamp, .. }
            | ReadinessStatus::NotReady { timestamp, .. } => {
                *timestamp
            }
        }
    }
}
