//! # Storefront
//!
//! Operational plumbing for the Storefront backend.
//!
//! Liveness and readiness probes for the long running API service and
//! batch tasks that reconcile stored catalogue metadata.
//!
#![deny(missing_docs, unused_imports)]
#![allow(clippy::result_large_err)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod error;
pub mod gateway;
pub mod health;
#[cfg(feature = "tasks")]
pub mod tasks;
pub mod utils;

#[cfg(feature = "models")]
pub mod db;
#[cfg(feature = "models")]
pub mod models;

pub use error::{ErrorKind, StorefrontError};
pub use gateway::DatabaseGateway;
pub use health::Prober;
pub use utils::config::{Config, DatabaseConfig};

#[cfg(feature = "models")]
pub use db::Database;

/// Storefront Banner
pub const STOREFRONT_BANNER: &str = r#"  ____  _                  __                 _
 / ___|| |_ ___  _ __ ___ / _|_ __ ___  _ __ | |_
 \___ \| __/ _ \| '__/ _ \ |_| '__/ _ \| '_ \| __|
  ___) | || (_) | | |  __/  _| | | (_) | | | | |_
 |____/ \__\___/|_|  \___|_| |_|  \___/|_| |_|\__|"#;

/// Storefront Version
pub const STOREFRONT_VERSION: &str = env!("CARGO_PKG_VERSION");
