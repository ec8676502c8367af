//! Storage backend implementations
//!
//! This module contains implementations of the storage traits for different databases.
//! At least one backend must be enabled via feature flags.

#[cfg(any(feature = "sqlite", feature = "mysql"))]
mod rows;
#[cfg(any(feature = "sqlite", feature = "mysql"))]
mod sql;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mysql")]
pub mod mysql;
