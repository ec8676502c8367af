//! Audit revision recording
//!
//! Every mutating operation writes exactly one revision inside its own
//! transaction. A failed audit write fails the transaction.

use chrono::Utc;
use tracing::debug;

use crate::error::StorageError;
use crate::traits::ConfigTransaction;

/// Append a configuration-affecting audit revision to `tx`
///
/// The revision is stamped with the current time. The transaction stays
/// open for the caller's further writes.
pub async fn record(
    tx: &mut dyn ConfigTransaction,
    server_tag: &str,
    message: &str,
) -> Result<(), StorageError> {
    tx.record_audit_revision(Utc::now(), server_tag, message, true)
        .await?;
    debug!(server_tag, message, "Recorded audit revision");
    Ok(())
}

pub(crate) fn add_server_message(tag: &str) -> String {
    format!("add new server: {}", tag)
}

pub(crate) fn add_shared_network_message(name: &str) -> String {
    format!("add new shared network: {}", name)
}

pub(crate) fn add_subnet_message(prefix: &str) -> String {
    format!("add new subnet: {}", prefix)
}
