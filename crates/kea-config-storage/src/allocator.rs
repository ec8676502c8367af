//! Sequential subnet ID allocation
//!
//! The next ID is the highest existing ID plus one, or [`SubnetId::FIRST`]
//! for an empty table. The read goes through the caller's open transaction
//! and the backend locks it until that transaction ends, so the ID returned
//! here cannot be handed out twice as long as the insert happens in the
//! same transaction.

use tracing::debug;

use crate::error::StorageError;
use crate::traits::ConfigTransaction;
use crate::types::SubnetId;

/// Compute the ID for the next subnet inserted through `tx`
///
/// # Errors
///
/// * `StorageError::InvalidData` - the highest ID is already `u32::MAX`
/// * `StorageError::TransactionFailed` - the read failed
pub async fn next_subnet_id(tx: &mut dyn ConfigTransaction) -> Result<SubnetId, StorageError> {
    let next = match tx.last_subnet_id().await? {
        None => SubnetId::FIRST,
        Some(last) => last.next().ok_or_else(|| {
            StorageError::InvalidData(format!("subnet id space exhausted after {}", last))
        })?,
    };

    debug!(subnet_id = %next, "Allocated subnet id");
    Ok(next)
}
