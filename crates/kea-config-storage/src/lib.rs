//! Transactional configuration store for Kea DHCPv4
//!
//! Persists servers, shared networks and subnets together with an
//! append-only audit trail. Every create operation is one atomic
//! transaction: the audit revision, the subnet ID allocation and the row
//! inserts either all commit or all roll back.
//!
//! # Supported Backends
//!
//! - **SQLite** (feature: `sqlite`, default) - embedded database for tests and small setups
//! - **MySQL** (feature: `mysql`) - the database Kea servers read their configuration from
//!
//! # Architecture
//!
//! Backends implement the storage traits:
//! - [`ConfigRepository`] - committed-state queries (read side)
//! - [`ConfigTransaction`] - one open transaction (write side)
//! - [`ConfigStore`] - transactions plus lifecycle (initialize, health check, close)
//!
//! The operations callers use are free functions over those traits:
//! - [`repository`] - lookups and existence checks
//! - [`allocator`] - sequential subnet IDs
//! - [`audit`] - audit revisions
//! - [`writer`] - the create operations
//!
//! # Examples
//!
//! ```no_run
//! use kea_config_storage::{create_storage, repository, writer, StorageConfig};
//! use kea_config_storage::{Server, SharedNetwork, Subnet};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorageConfig::from_url("sqlite://:memory:")?;
//! let store = create_storage(&config).await?;
//!
//! let mut server = Server::new("all", "every server");
//! writer::create_server(store.as_ref(), &mut server).await?;
//!
//! let mut network = SharedNetwork::new("floor-3");
//! writer::create_shared_network(store.as_ref(), &server, &mut network).await?;
//!
//! let mut subnet = Subnet::new("10.83.27.0/24");
//! writer::create_subnet(store.as_ref(), &server, &network, &mut subnet).await?;
//!
//! assert!(repository::subnet_exists(store.as_ref(), "10.83.27.0/24").await?);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod traits;
mod types;

pub mod allocator;
pub mod audit;
pub mod backends;
pub mod repository;
pub mod writer;

// Re-exports
pub use config::{BackendType, ConfigError, StorageConfig};
pub use error::{BoxedError, StorageError};
pub use traits::{ConfigRepository, ConfigStore, ConfigTransaction};
pub use types::{
    AuditRevision, DdnsReplaceClientName, ParameterBlock, ReservationMode, RowCounts, Server,
    SharedNetwork, Subnet, SubnetId,
};

/// Create storage from configuration
///
/// This is the primary entry point for creating a storage backend.
/// It creates the backend selected by `config` and applies the schema.
///
/// # Errors
///
/// Returns `StorageError::InvalidConnectionString` if the backend type
/// is not compiled in (missing feature flag).
pub async fn create_storage(
    config: &StorageConfig,
) -> Result<std::sync::Arc<dyn ConfigStore>, StorageError> {
    let storage: std::sync::Arc<dyn ConfigStore> = match config.backend {
        #[cfg(feature = "sqlite")]
        BackendType::Sqlite => std::sync::Arc::new(
            backends::sqlite::SqliteStorage::new(&config.connection_string).await?,
        ),
        #[cfg(not(feature = "sqlite"))]
        BackendType::Sqlite => {
            return Err(StorageError::InvalidConnectionString(
                "SQLite backend not compiled in (enable 'sqlite' feature)".into(),
            ))
        }
        #[cfg(feature = "mysql")]
        BackendType::MySql => std::sync::Arc::new(
            backends::mysql::MySqlStorage::new(&config.connection_string, config.pool_size)
                .await?,
        ),
        #[cfg(not(feature = "mysql"))]
        BackendType::MySql => {
            return Err(StorageError::InvalidConnectionString(
                "MySQL backend not compiled in (enable 'mysql' feature)".into(),
            ))
        }
    };

    storage.initialize().await?;
    tracing::info!(
        backend = storage.backend_name(),
        url = %config.redacted(),
        "Configuration store ready"
    );
    Ok(storage)
}
