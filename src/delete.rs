//! `witb delete box` / `witb delete item`.

use anyhow::Result;

use witb_core::{Catalog, Inventory};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

pub async fn run_delete_box(config: &Config, id: i64) -> Result<()> {
    // Edits and deletes never allocate aliases.
    let catalog = Catalog::default();
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    inventory.delete_box(id).await?;
    println!("Deleted box with ID: {}", id);
    Ok(())
}

pub async fn run_delete_item(config: &Config, id: i64) -> Result<()> {
    // Edits and deletes never allocate aliases.
    let catalog = Catalog::default();
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    inventory.delete_item(id).await?;
    println!("Deleted item with ID: {}", id);
    Ok(())
}
