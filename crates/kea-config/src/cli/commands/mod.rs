//! Command handlers for the kea-config CLI.
//!
//! Handlers bridge parsed arguments to the storage crate: lookups go through
//! `repository`, creates through `writer`.

pub mod address;
pub mod audit;
pub mod init;
pub mod server;
pub mod shared_network;
pub mod subnet;

use anyhow::Result;
use kea_config_storage::{repository, ConfigStore, Server, StorageError};

/// Resolve the acting server, failing with `NotFound` when it does not exist
pub(crate) async fn require_server(store: &dyn ConfigStore, tag: &str) -> Result<Server> {
    repository::find_server(store, tag)
        .await?
        .ok_or_else(|| {
            StorageError::NotFound {
                entity_type: "server",
                key: tag.to_string(),
            }
            .into()
        })
}
