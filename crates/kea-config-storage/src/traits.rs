//! Storage trait definitions
//!
//! - ConfigRepository: read side, committed state only
//! - ConfigTransaction: write side, one open transaction
//! - ConfigStore: repository plus transactions and lifecycle management

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::types::{AuditRevision, RowCounts, Server, SharedNetwork, Subnet, SubnetId};

/// Read-only queries against committed state
///
/// Lookups return the raw row when one matched; callers that need the
/// zero-value check go through [`crate::repository`].
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Get a server by its unique tag
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    /// * `StorageError::StorageUnavailable` - Backend unreachable
    async fn server_by_tag(&self, tag: &str) -> Result<Option<Server>, StorageError>;

    /// Get a shared network by its unique name, with associated servers
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    /// * `StorageError::StorageUnavailable` - Backend unreachable
    async fn shared_network_by_name(
        &self,
        name: &str,
    ) -> Result<Option<SharedNetwork>, StorageError>;

    /// Get a subnet by its unique prefix, with associated servers
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    /// * `StorageError::StorageUnavailable` - Backend unreachable
    async fn subnet_by_prefix(&self, prefix: &str) -> Result<Option<Subnet>, StorageError>;

    /// Get a subnet by its sequential ID, with associated servers
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    /// * `StorageError::StorageUnavailable` - Backend unreachable
    async fn subnet_by_id(&self, id: SubnetId) -> Result<Option<Subnet>, StorageError>;

    /// List all servers ordered by tag
    async fn list_servers(&self) -> Result<Vec<Server>, StorageError>;

    /// List all shared networks ordered by name
    async fn list_shared_networks(&self) -> Result<Vec<SharedNetwork>, StorageError>;

    /// List all subnets ordered by ID
    async fn list_subnets(&self) -> Result<Vec<Subnet>, StorageError>;

    /// List audit revisions in insertion order
    async fn list_audit_revisions(&self) -> Result<Vec<AuditRevision>, StorageError>;

    /// Count rows in every table the writer touches
    async fn row_counts(&self) -> Result<RowCounts, StorageError>;
}

/// One open transaction against the store
///
/// Must be closed by exactly one of [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). Dropping an open transaction rolls it back.
#[async_trait]
pub trait ConfigTransaction: Send {
    /// Append an audit revision row
    ///
    /// Mirrors Kea's `createAuditRevisionDHCP4(ts, server_tag, message, cascade)`.
    ///
    /// # Errors
    /// * `StorageError::TransactionFailed` - The row could not be written
    async fn record_audit_revision(
        &mut self,
        modified_at: DateTime<Utc>,
        server_tag: &str,
        message: &str,
        affects_config: bool,
    ) -> Result<(), StorageError>;

    /// Highest existing subnet ID, read under the transaction's write lock
    ///
    /// # Errors
    /// * `StorageError::TransactionFailed` - Database error
    async fn last_subnet_id(&mut self) -> Result<Option<SubnetId>, StorageError>;

    /// Insert a server row, returning its store-assigned ID
    ///
    /// # Errors
    /// * `StorageError::DuplicateEntity` - Tag already exists
    /// * `StorageError::TransactionFailed` - Database error
    async fn insert_server(&mut self, server: &Server) -> Result<i64, StorageError>;

    /// Insert a shared network row plus its server associations
    ///
    /// Returns the store-assigned network ID.
    ///
    /// # Errors
    /// * `StorageError::DuplicateEntity` - Name already exists
    /// * `StorageError::TransactionFailed` - Database error
    async fn insert_shared_network(&mut self, network: &SharedNetwork)
        -> Result<i64, StorageError>;

    /// Insert a subnet row plus its server associations
    ///
    /// `subnet.id` must already be allocated.
    ///
    /// # Errors
    /// * `StorageError::DuplicateEntity` - Prefix or ID already exists
    /// * `StorageError::TransactionFailed` - Database error
    async fn insert_subnet(&mut self, subnet: &Subnet) -> Result<(), StorageError>;

    /// Make every write of this transaction durable
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discard every write of this transaction
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}

/// Combined storage interface with lifecycle management
///
/// This is the trait consumers hold. It adds transaction creation and
/// lifecycle methods to [`ConfigRepository`].
#[async_trait]
pub trait ConfigStore: ConfigRepository {
    /// Backend name for logging (`sqlite`, `mysql`)
    fn backend_name(&self) -> &'static str;

    /// Open a new transaction
    ///
    /// # Errors
    /// * `StorageError::StorageUnavailable` - No connection could be acquired
    async fn begin(&self) -> Result<Box<dyn ConfigTransaction>, StorageError>;

    /// Initialize storage (schema setup, migrations)
    ///
    /// Must be called before any other operations. Idempotent - safe to
    /// call multiple times.
    ///
    /// # Errors
    /// * `StorageError::Migration` - Schema setup failed
    /// * `StorageError::StorageUnavailable` - Connection failed
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Check storage health and connectivity
    ///
    /// # Errors
    /// * `StorageError::StorageUnavailable` - Backend unreachable or schema missing
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Close storage connections and clean up resources
    ///
    /// After calling close, no other operations should be performed.
    async fn close(&self) -> Result<(), StorageError>;
}
