//! Configuration writer
//!
//! Each create operation runs as one transaction:
//!
//! 1. validate the input (before anything touches the store)
//! 2. open a transaction
//! 3. record the audit revision
//! 4. allocate the subnet ID (subnets only)
//! 5. insert the row and its server associations
//! 6. commit, or roll back on the first error
//!
//! The caller's struct is only updated after a successful commit. On error
//! it is left exactly as passed in.

use chrono::Utc;
use kea_config_common::{
    validate_server_tag, validate_shared_network_name, validate_subnet_prefix,
};
use tracing::{debug, info, instrument, warn};

use crate::allocator;
use crate::audit;
use crate::error::StorageError;
use crate::traits::{ConfigStore, ConfigTransaction};
use crate::types::{Server, SharedNetwork, Subnet, SubnetId};

/// Commit `tx` if `result` is `Ok`, roll it back otherwise
///
/// A failed rollback is logged; the error returned is always the one that
/// caused it.
async fn finish<T>(
    tx: Box<dyn ConfigTransaction>,
    result: Result<T, StorageError>,
) -> Result<T, StorageError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

async fn begin<S>(store: &S) -> Result<Box<dyn ConfigTransaction>, StorageError>
where
    S: ConfigStore + ?Sized,
{
    let tx = store.begin().await?;
    debug!(backend = store.backend_name(), "Opened transaction");
    Ok(tx)
}

/// Register a new server
///
/// The audit revision is tagged with the new server's own tag.
///
/// # Errors
///
/// * `StorageError::Validation` - the tag is malformed
/// * `StorageError::DuplicateEntity` - a server with this tag exists
/// * `StorageError::StorageUnavailable` / `TransactionFailed` - store failure
#[instrument(skip_all, fields(server = %server.tag))]
pub async fn create_server<S>(store: &S, server: &mut Server) -> Result<(), StorageError>
where
    S: ConfigStore + ?Sized,
{
    validate_server_tag(&server.tag)?;

    let mut staged = server.clone();
    staged.modified_at = Utc::now();

    let mut tx = begin(store).await?;
    let result = async {
        let message = audit::add_server_message(&staged.tag);
        audit::record(tx.as_mut(), &staged.tag, &message).await?;
        tx.insert_server(&staged).await
    }
    .await;
    let id = finish(tx, result).await?;

    staged.id = id;
    *server = staged;
    info!(id, "Created server");
    Ok(())
}

/// Create a shared network assigned to `server`
///
/// # Errors
///
/// * `StorageError::Validation` - the server tag or network name is malformed
/// * `StorageError::NotFound` - `server` does not exist in the store
/// * `StorageError::DuplicateEntity` - a network with this name exists
/// * `StorageError::StorageUnavailable` / `TransactionFailed` - store failure
#[instrument(skip_all, fields(server = %server.tag, shared_network = %network.name))]
pub async fn create_shared_network<S>(
    store: &S,
    server: &Server,
    network: &mut SharedNetwork,
) -> Result<(), StorageError>
where
    S: ConfigStore + ?Sized,
{
    validate_server_tag(&server.tag)?;
    validate_shared_network_name(&network.name)?;

    let mut staged = network.clone();
    staged.parameters.modified_at = Utc::now();
    staged.add_server(server);

    let mut tx = begin(store).await?;
    let result = async {
        audit::record(
            tx.as_mut(),
            &server.tag,
            &audit::add_shared_network_message(&staged.name),
        )
        .await?;
        tx.insert_shared_network(&staged).await
    }
    .await;
    let id = finish(tx, result).await?;

    staged.id = id;
    *network = staged;
    info!(id, "Created shared network");
    Ok(())
}

/// Create a subnet inside `shared_network`, assigned to `server`
///
/// The subnet's shared-network reference is set to `shared_network.name`
/// and its ID is allocated inside the transaction.
///
/// # Errors
///
/// * `StorageError::Validation` - malformed tag, name or prefix
/// * `StorageError::NotFound` - `server` does not exist in the store
/// * `StorageError::DuplicateEntity` - a subnet with this prefix exists
/// * `StorageError::StorageUnavailable` / `TransactionFailed` - store failure,
///   including a `shared_network` that was never created
#[instrument(
    skip_all,
    fields(server = %server.tag, shared_network = %shared_network.name, prefix = %subnet.prefix)
)]
pub async fn create_subnet<S>(
    store: &S,
    server: &Server,
    shared_network: &SharedNetwork,
    subnet: &mut Subnet,
) -> Result<(), StorageError>
where
    S: ConfigStore + ?Sized,
{
    validate_shared_network_name(&shared_network.name)?;
    insert_subnet(store, server, Some(&shared_network.name), subnet).await
}

/// Create a subnet that belongs to no shared network
///
/// Same protocol as [`create_subnet`] with the shared-network reference
/// left unset.
#[instrument(skip_all, fields(server = %server.tag, prefix = %subnet.prefix))]
pub async fn create_unassigned_subnet<S>(
    store: &S,
    server: &Server,
    subnet: &mut Subnet,
) -> Result<(), StorageError>
where
    S: ConfigStore + ?Sized,
{
    insert_subnet(store, server, None, subnet).await
}

async fn insert_subnet<S>(
    store: &S,
    server: &Server,
    shared_network_name: Option<&str>,
    subnet: &mut Subnet,
) -> Result<(), StorageError>
where
    S: ConfigStore + ?Sized,
{
    validate_server_tag(&server.tag)?;
    let prefix = validate_subnet_prefix(&subnet.prefix)?;

    let mut staged = subnet.clone();
    staged.prefix = prefix.to_string();
    staged.shared_network_name = shared_network_name.map(str::to_string);
    staged.parameters.modified_at = Utc::now();
    staged.add_server(server);

    let mut tx = begin(store).await?;
    let result = async {
        audit::record(
            tx.as_mut(),
            &server.tag,
            &audit::add_subnet_message(&staged.prefix),
        )
        .await?;
        let id = allocator::next_subnet_id(tx.as_mut()).await?;
        staged.id = Some(id);
        tx.insert_subnet(&staged).await?;
        Ok::<SubnetId, StorageError>(id)
    }
    .await;
    let id = finish(tx, result).await?;

    *subnet = staged;
    info!(subnet_id = %id, "Created subnet");
    Ok(())
}
