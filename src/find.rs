//! `witb find boxes|items|all`: filtered listings as plain tables or JSON.

use anyhow::Result;

use witb_core::models::{BoxFilter, BoxRecord, ItemFilter, ItemRecord};
use witb_core::{Catalog, Inventory};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

fn opt_num(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_text(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}

fn print_box_header() {
    println!(
        "{:<6} {:<14} {:<24} {:>7} {:>7} {:>7} {:<16} {:<16} PICTURE",
        "ID", "ALIAS", "DESCRIPTION", "HEIGHT", "LENGTH", "WEIGHT", "LOCATION", "TAGS"
    );
}

fn print_box_row(b: &BoxRecord) {
    println!(
        "{:<6} {:<14} {:<24} {:>7} {:>7} {:>7} {:<16} {:<16} {}",
        b.id,
        b.alias,
        opt_text(&b.description),
        opt_num(b.height),
        opt_num(b.length),
        opt_num(b.weight),
        opt_text(&b.location),
        opt_text(&b.tags),
        opt_text(&b.picture),
    );
}

fn print_item_header() {
    println!(
        "{:<6} {:<6} {:<14} {:<24} {:>7} {:>7} {:>7} {:<16} {:<16} PICTURE",
        "ID", "BOX", "ALIAS", "DESCRIPTION", "HEIGHT", "LENGTH", "WEIGHT", "LOCATION", "TAGS"
    );
}

fn print_item_row(i: &ItemRecord) {
    println!(
        "{:<6} {:<6} {:<14} {:<24} {:>7} {:>7} {:>7} {:<16} {:<16} {}",
        i.id,
        i.box_id,
        i.alias,
        opt_text(&i.description),
        opt_num(i.height),
        opt_num(i.length),
        opt_num(i.weight),
        opt_text(&i.location),
        opt_text(&i.tags),
        opt_text(&i.picture),
    );
}

pub async fn run_find_boxes(config: &Config, filter: BoxFilter, json: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let catalog = Catalog::default();
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let boxes = inventory.find_boxes(&filter).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&boxes)?);
        return Ok(());
    }
    if boxes.is_empty() {
        println!("No boxes found.");
        return Ok(());
    }
    print_box_header();
    for b in &boxes {
        print_box_row(b);
    }
    Ok(())
}

pub async fn run_find_items(config: &Config, filter: ItemFilter, json: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let catalog = Catalog::default();
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let items = inventory.find_items(&filter).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }
    print_item_header();
    for i in &items {
        print_item_row(i);
    }
    Ok(())
}

/// Every box in natural alias order, each followed by its items.
pub async fn run_find_all(config: &Config, json: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let catalog = Catalog::default();
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let all = inventory.list_all().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }
    if all.is_empty() {
        println!("No boxes found.");
        return Ok(());
    }

    print_box_header();
    for contents in &all {
        print_box_row(&contents.record);
    }

    for contents in &all {
        let b = &contents.record;
        if contents.items.is_empty() {
            println!("\nNo items in box {} (ID {}).", b.alias, b.id);
            continue;
        }
        println!("\nItems in box {} (ID {}):", b.alias, b.id);
        print_item_header();
        for i in &contents.items {
            print_item_row(i);
        }
    }
    Ok(())
}
