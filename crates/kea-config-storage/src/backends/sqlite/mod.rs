//! SQLite storage backend implementation using sqlx
//!
//! SQLite is the embedded backend: tests run against `:memory:` databases,
//! small deployments and lab setups use a file.
//!
//! # Architecture
//!
//! - **migrations**: SQL schema in `migrations/sqlite/` (applied via sqlx)
//! - **repository**: read side (servers, shared networks, subnets, audit log)
//! - **transaction**: write side ([`SqliteTransaction`])
//!
//! # Audit revisions
//!
//! SQLite has no stored procedures, so the audit revision is a plain
//! `INSERT INTO dhcp4_audit_revision` inside the caller's transaction.
//!
//! # Write serialization
//!
//! sqlx opens deferred transactions. The writer always records the audit
//! revision first, and that insert takes SQLite's database-wide write lock.
//! The subnet ID read and the subnet insert that follow therefore run with
//! no other writer in between.
//!
//! # Security
//!
//! All queries use sqlx's prepared statement bindings (`bind()`) to prevent
//! SQL injection. User-provided data is never interpolated into query strings.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::StorageError;
use crate::traits::{ConfigRepository, ConfigStore, ConfigTransaction};
use crate::types::{AuditRevision, RowCounts, Server, SharedNetwork, Subnet, SubnetId};

mod repository;
mod transaction;

pub use transaction::SqliteTransaction;

/// Embedded SQLite migrations
///
/// These migrations are compiled into the binary and applied at runtime.
/// Migration files are in `migrations/sqlite/` directory.
static MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("migrations/sqlite");

/// SQLite storage backend
///
/// # Examples
///
/// ```no_run
/// use kea_config_storage::backends::sqlite::SqliteStorage;
/// use kea_config_storage::ConfigStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // In-memory database for testing
/// let storage = SqliteStorage::new(":memory:").await?;
/// storage.initialize().await?;
///
/// // File-based database
/// let storage = SqliteStorage::new("/var/lib/kea/config.sqlite").await?;
/// storage.initialize().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage backend
    ///
    /// # Arguments
    ///
    /// * `path` - Database path or `:memory:` for in-memory database
    ///
    /// # Pool Configuration
    ///
    /// - file databases: 1-5 connections, WAL journal
    /// - `:memory:`: exactly one connection that is never recycled, since
    ///   every SQLite connection to `:memory:` opens a separate database
    ///
    /// # Errors
    ///
    /// Returns `StorageError::StorageUnavailable` if the database cannot be opened.
    pub async fn new(path: &str) -> Result<Self, StorageError> {
        let in_memory = path == ":memory:";

        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::unavailable("invalid SQLite URL", e))?
        } else {
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", path))
                .map_err(|e| StorageError::unavailable("invalid SQLite URL", e))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        }
        .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(5) // SQLite is single-writer
                .idle_timeout(Duration::from_secs(600))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::unavailable("failed to create SQLite pool", e))?;

        debug!(path, "opened SQLite configuration store");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool for internal use
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ConfigRepository for SqliteStorage {
    async fn server_by_tag(&self, tag: &str) -> Result<Option<Server>, StorageError> {
        self.server_by_tag_impl(tag).await
    }

    async fn shared_network_by_name(
        &self,
        name: &str,
    ) -> Result<Option<SharedNetwork>, StorageError> {
        self.shared_network_by_name_impl(name).await
    }

    async fn subnet_by_prefix(&self, prefix: &str) -> Result<Option<Subnet>, StorageError> {
        self.subnet_by_prefix_impl(prefix).await
    }

    async fn subnet_by_id(&self, id: SubnetId) -> Result<Option<Subnet>, StorageError> {
        self.subnet_by_id_impl(id).await
    }

    async fn list_servers(&self) -> Result<Vec<Server>, StorageError> {
        self.list_servers_impl().await
    }

    async fn list_shared_networks(&self) -> Result<Vec<SharedNetwork>, StorageError> {
        self.list_shared_networks_impl().await
    }

    async fn list_subnets(&self) -> Result<Vec<Subnet>, StorageError> {
        self.list_subnets_impl().await
    }

    async fn list_audit_revisions(&self) -> Result<Vec<AuditRevision>, StorageError> {
        self.list_audit_revisions_impl().await
    }

    async fn row_counts(&self) -> Result<RowCounts, StorageError> {
        self.row_counts_impl().await
    }
}

#[async_trait]
impl ConfigStore for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn begin(&self) -> Result<Box<dyn ConfigTransaction>, StorageError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::from_lifecycle(e, "failed to begin transaction"))?;
        Ok(Box::new(SqliteTransaction::new(tx)))
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        MIGRATIONS
            .run(self.pool())
            .await
            .map_err(|e| StorageError::migration("failed to run SQLite migrations", e))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::unavailable("health check: database connection failed", e))?;

        let table_exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM sqlite_master
                WHERE type = 'table' AND name = 'dhcp4_subnet'
            )
            "#,
        )
        .fetch_one(self.pool())
        .await
        .map_err(|e| StorageError::unavailable("health check: failed to verify schema", e))?;

        if !table_exists {
            return Err(StorageError::unavailable(
                "health check: schema not initialized (dhcp4_subnet table missing)",
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "schema not initialized - call initialize() first",
                ),
            ));
        }

        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}
