//! This module contains the batch tasks that are run by the CLI.

use async_trait::async_trait;

use crate::DatabaseGateway;

pub mod reconcile;

pub use reconcile::{CategoryImageMapping, CategoryImageMappings, ReconcileReport, ReconcileTask};

/// Task Trait
#[async_trait]
pub trait TaskTrait {
    /// Result produced by a completed run
    type Output: Send;

    /// Run the task
    async fn run(
        &self,
        database: &dyn DatabaseGateway,
    ) -> Result<Self::Output, crate::StorefrontError>;
}
