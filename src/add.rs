//! `witb add box` / `witb add item`.

use anyhow::Result;

use witb_core::models::{NewBox, NewItem};
use witb_core::Inventory;

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::sqlite_store::SqliteStore;

pub async fn run_add_box(config: &Config, new: NewBox) -> Result<()> {
    let catalog = load_catalog(config)?;
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let record = inventory.add_box(new).await?;
    println!("Added box with ID: {} (alias: {})", record.id, record.alias);
    println!("qr_code: {}", record.qr_code);
    Ok(())
}

pub async fn run_add_item(config: &Config, new: NewItem, theme: Option<&str>) -> Result<()> {
    let catalog = load_catalog(config)?;
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let record = inventory.add_item(new, theme).await?;
    println!(
        "Added item with ID: {} (alias: {}) to box ID: {}",
        record.id, record.alias, record.box_id
    );
    Ok(())
}
