//! Inventory statistics and theme usage overview.
//!
//! Provides a quick summary of what's catalogued: box and item counts and a
//! per-theme breakdown of how many boxes each theme names. Used by
//! `witb stats` to show how close each theme is to overflowing.

use std::collections::BTreeMap;

use anyhow::Result;

use witb_core::{resolve_theme, Inventory, ResolutionSource};

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Per-theme usage.
#[derive(Default)]
struct ThemeStats {
    words: usize,
    boxes: usize,
    items: usize,
    last_added_ts: Option<i64>,
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let store = SqliteStore::open(config).await?;

    let total_boxes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boxes")
        .fetch_one(store.pool())
        .await?;
    let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(store.pool())
        .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("What's In The Box: Inventory Stats");
    println!("==================================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!("  Themes:      {}", catalog.len());
    println!();
    println!("  Boxes:       {}", total_boxes);
    println!("  Items:       {}", total_items);

    let mut by_theme: BTreeMap<String, ThemeStats> = catalog
        .iter()
        .map(|t| {
            (
                t.name.clone(),
                ThemeStats {
                    words: t.words.len(),
                    ..Default::default()
                },
            )
        })
        .collect();
    let mut unmatched = 0usize;

    let inventory = Inventory::new(&store, &catalog, config.alias_settings());
    for contents in inventory.list_all().await? {
        let resolution = resolve_theme(
            &contents.record.alias,
            &catalog,
            config.alias_settings().theme_match,
        );
        let theme = match resolution {
            Ok(r) if r.source == ResolutionSource::Matched => r.theme,
            _ => {
                unmatched += 1;
                continue;
            }
        };
        if let Some(s) = by_theme.get_mut(&theme) {
            s.boxes += 1;
            s.items += contents.items.len();
            let ts = contents.record.created_at;
            s.last_added_ts = Some(s.last_added_ts.map_or(ts, |prev| prev.max(ts)));
        }
    }

    if !by_theme.is_empty() {
        println!();
        println!("  By theme:");
        println!(
            "  {:<20} {:>6} {:>6} {:>6}   {}",
            "THEME", "WORDS", "BOXES", "ITEMS", "LAST BOX"
        );
        println!("  {}", "-".repeat(64));

        for (name, s) in &by_theme {
            let last_display = match s.last_added_ts {
                Some(ts) => format_ts_relative(ts),
                None => "never".to_string(),
            };
            println!(
                "  {:<20} {:>6} {:>6} {:>6}   {}",
                name, s.words, s.boxes, s.items, last_display
            );
        }
    }

    if unmatched > 0 {
        println!();
        println!("  Boxes matching no theme: {}", unmatched);
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_ts_relative() {
        let now = chrono::Utc::now().timestamp();
        assert_eq!(format_ts_relative(now), "just now");
        assert_eq!(format_ts_relative(now - 7200), "2 hours ago");
        assert_eq!(format_ts_relative(now - 86400), "1 day ago");
    }
}
