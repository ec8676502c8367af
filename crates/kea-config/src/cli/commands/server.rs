use anyhow::Result;
use kea_config_storage::{writer, ConfigStore, Server};

use crate::cli::{
    output::{print_item, print_items},
    OutputFormat, ServerCommand,
};

use super::require_server;

pub async fn handle(
    store: &dyn ConfigStore,
    command: ServerCommand,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        ServerCommand::Add { tag, description } => {
            let mut server = Server::new(tag, description);
            writer::create_server(store, &mut server).await?;
            if !quiet {
                print_item(&server, format);
            }
        }

        ServerCommand::Show { tag } => {
            let server = require_server(store, &tag).await?;
            print_item(&server, format);
        }

        ServerCommand::List => {
            let servers = store.list_servers().await?;
            print_items(&servers, format);
        }
    }
    Ok(())
}
