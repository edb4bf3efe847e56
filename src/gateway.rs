//! # Database Gateway
//!
//! The narrow set of database operations the probes and tasks need.
//!
//! Implementations must be safe to share between concurrent probe requests.
//! Errors are reported as [StorefrontError] so callers can tell a failing
//! query ([StorefrontError::QueryFailure]) apart from a missing row
//! ([StorefrontError::NotFound]).

use async_trait::async_trait;

use crate::StorefrontError;

/// Database Gateway
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Name of the database backend (used in logs and error messages)
    fn backend(&self) -> &str;

    /// Run a trivial `SELECT 1` round-trip
    async fn ping(&self) -> Result<(), StorefrontError>;

    /// Count the users in the active state
    ///
    /// A count query that yields no row is reported as `0`.
    async fn count_active_users(&self) -> Result<i64, StorefrontError>;

    /// Fetch the image path currently stored on a category
    async fn category_image(&self, category_id: i32) -> Result<Option<String>, StorefrontError>;

    /// Overwrite the image path of a category
    async fn set_category_image(
        &self,
        category_id: i32,
        image_path: &str,
    ) -> Result<(), StorefrontError>;
}
