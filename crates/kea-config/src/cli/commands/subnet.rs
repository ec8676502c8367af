use anyhow::Result;
use kea_config_storage::{repository, writer, ConfigStore, StorageError, Subnet, SubnetId};

use crate::cli::{
    output::{print_item, print_items},
    OutputFormat, SubnetCommand,
};

use super::require_server;

pub async fn handle(
    store: &dyn ConfigStore,
    command: SubnetCommand,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        SubnetCommand::Add {
            prefix,
            shared_network,
            server,
            v4o6_interface,
            v4o6_interface_id,
            v4o6_subnet,
            params,
        } => {
            let server = require_server(store, &server).await?;

            let mut subnet = Subnet::new(prefix);
            subnet.v4o6_interface = v4o6_interface;
            subnet.v4o6_interface_id = v4o6_interface_id;
            subnet.v4o6_subnet = v4o6_subnet;
            subnet.parameters = params.into_block();

            match shared_network {
                Some(name) => {
                    let network = repository::find_shared_network(store, &name)
                        .await?
                        .ok_or(StorageError::NotFound {
                            entity_type: "shared network",
                            key: name,
                        })?;
                    writer::create_subnet(store, &server, &network, &mut subnet).await?;
                }
                None => writer::create_unassigned_subnet(store, &server, &mut subnet).await?,
            }

            if !quiet {
                print_item(&subnet, format);
            }
        }

        SubnetCommand::Show { prefix, id } => {
            let (found, key) = match (prefix, id) {
                (_, Some(id)) => {
                    let found = store.subnet_by_id(SubnetId::new(id)).await?;
                    (found.filter(|s| !s.is_zero()), id.to_string())
                }
                (Some(prefix), None) => {
                    let found = repository::find_subnet(store, &prefix).await?;
                    (found, prefix)
                }
                (None, None) => anyhow::bail!("subnet show needs a prefix or --id"),
            };
            let subnet = found.ok_or(StorageError::NotFound {
                entity_type: "subnet",
                key,
            })?;
            print_item(&subnet, format);
        }

        SubnetCommand::List => {
            let subnets = store.list_subnets().await?;
            print_items(&subnets, format);
        }
    }
    Ok(())
}
