//! `witb edit box` / `witb edit item`.

use anyhow::Result;

use witb_core::models::{BoxPatch, ItemPatch};
use witb_core::{Catalog, Inventory};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Interpret a `--picture` argument: `none` (any case) removes the picture.
pub fn picture_patch(arg: Option<String>) -> Option<Option<String>> {
    arg.map(|p| if p.eq_ignore_ascii_case("none") { None } else { Some(p) })
}

pub async fn run_edit_box(config: &Config, id: i64, patch: BoxPatch) -> Result<()> {
    if patch.is_empty() {
        println!("No updates provided.");
        return Ok(());
    }
    // Edits and deletes never allocate aliases.
    let catalog = Catalog::default();
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let record = inventory.edit_box(id, &patch).await?;
    println!("Box ID: {} ({}) updated.", record.id, record.alias);
    if let Some(ref picture) = patch.picture {
        match picture {
            Some(p) => println!("Updated picture for Box ID: {} -> {}", id, p),
            None => println!("Removed picture from Box ID: {}", id),
        }
    }
    Ok(())
}

pub async fn run_edit_item(config: &Config, id: i64, patch: ItemPatch) -> Result<()> {
    if patch.is_empty() {
        println!("No updates provided.");
        return Ok(());
    }
    // Edits and deletes never allocate aliases.
    let catalog = Catalog::default();
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let record = inventory.edit_item(id, &patch).await?;
    println!("Item ID: {} ({}) updated.", record.id, record.alias);
    if let Some(ref picture) = patch.picture {
        match picture {
            Some(p) => println!("Updated picture for Item ID: {} -> {}", id, p),
            None => println!("Removed picture from Item ID: {}", id),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_patch() {
        assert_eq!(picture_patch(None), None);
        assert_eq!(picture_patch(Some("None".into())), Some(None));
        assert_eq!(
            picture_patch(Some("/pics/box.jpg".into())),
            Some(Some("/pics/box.jpg".to_string()))
        );
    }
}
