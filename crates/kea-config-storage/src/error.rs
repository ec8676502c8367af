//! Storage error types

use kea_config_common::ValidationError;
use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error for wrapping backend-specific errors
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity lookup missed
    #[error("not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    /// Unique constraint violation on a tag, name or prefix
    #[error("duplicate entity: {entity_type} {key} already exists")]
    DuplicateEntity {
        entity_type: &'static str,
        key: String,
    },

    /// Connection or transport failure
    #[error("storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Failure inside an open transaction; the transaction was rolled back
    #[error("transaction failed: {message}")]
    TransactionFailed {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Read query failure outside a transaction
    #[error("query failed: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Schema migration failure
    #[error("schema migration failed: {message}")]
    Migration {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Invalid connection string
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Invalid data (corruption or format error)
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Caller-supplied input failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl StorageError {
    /// Create a storage-unavailable error with source
    pub fn unavailable(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a transaction error with source
    pub fn transaction(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::TransactionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a query error with source
    pub fn query(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Query {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a migration error with source
    pub fn migration(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Migration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Map a driver error raised while a transaction is open
    ///
    /// Unique violations become `DuplicateEntity` for `entity_type`/`key`,
    /// transport failures become `StorageUnavailable`, anything else
    /// `TransactionFailed`.
    pub(crate) fn from_write(
        err: sqlx::Error,
        message: &str,
        entity_type: &'static str,
        key: &str,
    ) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::DuplicateEntity {
                    entity_type,
                    key: key.to_string(),
                };
            }
        }

        if is_transport_error(&err) {
            return Self::unavailable(message.to_string(), err);
        }

        Self::transaction(message.to_string(), err)
    }

    /// Map a driver error raised by a read outside a transaction
    pub(crate) fn from_read(err: sqlx::Error, message: &str) -> Self {
        if is_transport_error(&err) {
            Self::unavailable(message.to_string(), err)
        } else {
            Self::query(message.to_string(), err)
        }
    }

    /// Map a driver error raised while opening or closing a transaction
    pub(crate) fn from_lifecycle(err: sqlx::Error, message: &str) -> Self {
        if is_transport_error(&err) {
            Self::unavailable(message.to_string(), err)
        } else {
            Self::transaction(message.to_string(), err)
        }
    }

    /// Whether retrying the whole operation later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

fn is_transport_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
