//! Entity lookups by unique key
//!
//! Every lookup returns `Ok(None)` when nothing matched, so callers must
//! check before a dependent write. A fetched row whose key is empty counts
//! as a miss as well.

use crate::error::StorageError;
use crate::traits::ConfigRepository;
use crate::types::{Server, SharedNetwork, Subnet};

/// Find a server by tag
pub async fn find_server<R>(repo: &R, tag: &str) -> Result<Option<Server>, StorageError>
where
    R: ConfigRepository + ?Sized,
{
    Ok(repo.server_by_tag(tag).await?.filter(|s| !s.is_zero()))
}

/// Find a shared network by name, with its associated servers
pub async fn find_shared_network<R>(
    repo: &R,
    name: &str,
) -> Result<Option<SharedNetwork>, StorageError>
where
    R: ConfigRepository + ?Sized,
{
    Ok(repo
        .shared_network_by_name(name)
        .await?
        .filter(|n| !n.is_zero()))
}

/// Find a subnet by prefix, with its associated servers
pub async fn find_subnet<R>(repo: &R, prefix: &str) -> Result<Option<Subnet>, StorageError>
where
    R: ConfigRepository + ?Sized,
{
    Ok(repo.subnet_by_prefix(prefix).await?.filter(|s| !s.is_zero()))
}

pub async fn server_exists<R>(repo: &R, tag: &str) -> Result<bool, StorageError>
where
    R: ConfigRepository + ?Sized,
{
    Ok(find_server(repo, tag).await?.is_some())
}

pub async fn shared_network_exists<R>(repo: &R, name: &str) -> Result<bool, StorageError>
where
    R: ConfigRepository + ?Sized,
{
    Ok(find_shared_network(repo, name).await?.is_some())
}

pub async fn subnet_exists<R>(repo: &R, prefix: &str) -> Result<bool, StorageError>
where
    R: ConfigRepository + ?Sized,
{
    Ok(find_subnet(repo, prefix).await?.is_some())
}
