use anyhow::Result;
use kea_config_storage::ConfigStore;

use crate::cli::{output::print_items, AuditCommand, OutputFormat};

pub async fn handle(
    store: &dyn ConfigStore,
    command: AuditCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        AuditCommand::List { last } => {
            let mut revisions = store.list_audit_revisions().await?;
            if let Some(n) = last {
                let skip = revisions.len().saturating_sub(n);
                revisions.drain(..skip);
            }
            print_items(&revisions, format);
        }
    }
    Ok(())
}
