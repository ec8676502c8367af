use anyhow::Result;
use kea_config_storage::ConfigStore;

pub async fn handle(store: &dyn ConfigStore, quiet: bool) -> Result<()> {
    // create_storage has already applied the schema
    store.health_check().await?;
    if !quiet {
        eprintln!("{} configuration store is ready", store.backend_name());
    }
    Ok(())
}
