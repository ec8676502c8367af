use anyhow::Result;
use kea_config_storage::{repository, writer, ConfigStore, SharedNetwork, StorageError};

use crate::cli::{
    output::{print_item, print_items},
    OutputFormat, SharedNetworkCommand,
};

use super::require_server;

pub async fn handle(
    store: &dyn ConfigStore,
    command: SharedNetworkCommand,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        SharedNetworkCommand::Add {
            name,
            server,
            params,
        } => {
            let server = require_server(store, &server).await?;
            let mut network = SharedNetwork::new(name);
            network.parameters = params.into_block();
            writer::create_shared_network(store, &server, &mut network).await?;
            if !quiet {
                print_item(&network, format);
            }
        }

        SharedNetworkCommand::Show { name } => {
            let network = repository::find_shared_network(store, &name)
                .await?
                .ok_or(StorageError::NotFound {
                    entity_type: "shared network",
                    key: name,
                })?;
            print_item(&network, format);
        }

        SharedNetworkCommand::List => {
            let networks = store.list_shared_networks().await?;
            print_items(&networks, format);
        }
    }
    Ok(())
}
