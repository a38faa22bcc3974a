//! `witb themes list|resolve|next`: inspect the theme catalog and preview
//! alias allocation without creating anything.

use anyhow::{bail, Result};

use witb_core::{EntityKind, Inventory, ResolutionSource};

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Number of words shown per theme in `themes list`.
const PREVIEW_WORDS: usize = 5;

pub fn run_list_themes(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    if catalog.is_empty() {
        println!("No themes found in {}.", config.aliases.dir.display());
        return Ok(());
    }

    println!("{:<20} {:>6}  WORDS", "THEME", "COUNT");
    for name in catalog.sorted_names() {
        let Some(theme) = catalog.get(name) else {
            continue;
        };
        let mut preview = theme
            .words
            .iter()
            .take(PREVIEW_WORDS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if theme.words.len() > PREVIEW_WORDS {
            preview.push_str(", …");
        }
        println!("{:<20} {:>6}  {}", theme.name, theme.words.len(), preview);
    }

    for (short, long) in catalog.prefix_conflicts() {
        println!("warning: theme '{}' is a prefix of '{}'", short, long);
    }
    Ok(())
}

pub async fn run_resolve_theme(config: &Config, box_id: i64) -> Result<()> {
    let catalog = load_catalog(config)?;
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let resolution = inventory.find_theme_for_box(box_id).await?;
    let source = match resolution.source {
        ResolutionSource::Matched => "matched",
        ResolutionSource::Fallback => "fallback",
    };
    println!("theme: {} ({})", resolution.theme, source);
    Ok(())
}

/// Print the alias the next box (or next item in `box_id`) would get.
pub async fn run_next_alias(config: &Config, kind: EntityKind, box_id: Option<i64>) -> Result<()> {
    let catalog = load_catalog(config)?;
    let store = SqliteStore::open(config).await?;
    let inventory = Inventory::new(&store, &catalog, config.alias_settings());

    let alias = match (kind, box_id) {
        (EntityKind::Box, _) => inventory.preview_box_alias().await?,
        (EntityKind::Item, Some(id)) => inventory.preview_item_alias(id).await?,
        (EntityKind::Item, None) => bail!("--box-id is required to preview an item alias"),
    };
    println!("{}", alias);
    Ok(())
}
