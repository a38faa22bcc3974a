//! # What's In The Box CLI (`witb`)
//!
//! The `witb` binary is the scripting interface for the inventory: create,
//! edit, delete, and find boxes and items, and inspect the alias themes.
//!
//! ## Usage
//!
//! ```bash
//! witb --config ./config/witb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `witb init` | Create the SQLite database and run schema migrations |
//! | `witb add box` | Add a box; its alias is allocated from the theme catalog |
//! | `witb add item --box-id N` | Add an item; its alias comes from the box's theme |
//! | `witb edit box|item` | Update dimensions, location, description, tags, picture |
//! | `witb delete box|item` | Delete a box (with its items) or an item |
//! | `witb find boxes|items|all` | Search and list |
//! | `witb themes list|resolve|next` | Inspect themes and preview aliases |
//! | `witb stats` | Counts and per-theme usage |

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use whats_in_the_box::models::{BoxFilter, BoxPatch, ItemFilter, ItemPatch, NewBox, NewItem};
use whats_in_the_box::{add, config, db, delete, edit, find, migrate, stats, themes};
use witb_core::EntityKind;

/// What's In The Box: catalogue storage boxes and their contents under
/// memorable aliases.
#[derive(Parser)]
#[command(
    name = "witb",
    about = "What's In The Box: catalogue storage boxes and their contents under memorable aliases",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/witb.toml")]
    config: PathBuf,

    /// Log at debug level (overrides RUST_LOG and `[logging].level`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `boxes` and `items` tables.
    /// Running it multiple times is safe.
    Init,

    /// Add boxes and items.
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },

    /// Edit boxes and items.
    Edit {
        #[command(subcommand)]
        target: EditTarget,
    },

    /// Delete boxes and items.
    Delete {
        #[command(subcommand)]
        target: DeleteTarget,
    },

    /// Find boxes and items.
    Find {
        #[command(subcommand)]
        target: FindTarget,
    },

    /// Inspect alias themes.
    Themes {
        #[command(subcommand)]
        action: ThemesAction,
    },

    /// Show box and item counts and per-theme usage.
    Stats,
}

/// Physical attributes shared by boxes and items.
#[derive(Args)]
struct Attributes {
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    length: Option<f64>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    location: Option<String>,
    /// User-defined tags, comma-separated.
    #[arg(long)]
    tags: Option<String>,
}

#[derive(Subcommand)]
enum AddTarget {
    /// Add a new box. Its alias is the next free theme name.
    Box {
        #[arg(long)]
        description: String,
        #[command(flatten)]
        attrs: Attributes,
        /// Path to the box picture.
        #[arg(long)]
        picture: Option<String>,
    },
    /// Add a new item to a box. Its alias is the next free word of the box's theme.
    Item {
        /// ID of the box to add the item to.
        #[arg(long)]
        box_id: i64,
        #[arg(long)]
        description: String,
        #[command(flatten)]
        attrs: Attributes,
        /// Path to the item picture.
        #[arg(long)]
        picture: Option<String>,
        /// Draw the alias from this theme instead of the box's theme.
        #[arg(long)]
        theme: Option<String>,
    },
}

#[derive(Subcommand)]
enum EditTarget {
    /// Edit an existing box.
    Box {
        #[arg(long)]
        box_id: i64,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        attrs: Attributes,
        /// New picture path, or `none` to remove the existing picture.
        #[arg(long)]
        picture: Option<String>,
    },
    /// Edit an existing item.
    Item {
        #[arg(long)]
        item_id: i64,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        attrs: Attributes,
        /// New picture path, or `none` to remove the existing picture.
        #[arg(long)]
        picture: Option<String>,
    },
}

#[derive(Subcommand)]
enum DeleteTarget {
    /// Delete a box and every item in it.
    Box {
        #[arg(long)]
        box_id: i64,
    },
    /// Delete an item.
    Item {
        #[arg(long)]
        item_id: i64,
    },
}

#[derive(Subcommand)]
enum FindTarget {
    /// Find boxes. All given criteria must match.
    Boxes {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        alias: Option<String>,
        /// Case-insensitive text to look for in description or tags.
        #[arg(long)]
        text: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Find items. All given criteria must match.
    Items {
        #[arg(long)]
        box_id: Option<i64>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List every box in alias order, each with its items.
    All {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Box,
    Item,
}

impl From<KindArg> for EntityKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Box => EntityKind::Box,
            KindArg::Item => EntityKind::Item,
        }
    }
}

#[derive(Subcommand)]
enum ThemesAction {
    /// List loaded themes with their word counts.
    List,
    /// Show which theme a box's alias belongs to.
    Resolve {
        #[arg(long)]
        box_id: i64,
    },
    /// Preview the next alias without creating anything.
    Next {
        kind: KindArg,
        /// Box whose theme an item alias is drawn from.
        #[arg(long)]
        box_id: Option<i64>,
    },
}

fn setup_logging(verbose: bool, config_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = config::load_config(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    setup_logging(cli.verbose, &level);
    let cfg = loaded?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Add { target } => match target {
            AddTarget::Box {
                description,
                attrs,
                picture,
            } => {
                let new = NewBox {
                    height: attrs.height,
                    length: attrs.length,
                    weight: attrs.weight,
                    location: attrs.location,
                    picture,
                    tags: attrs.tags,
                    description: Some(description),
                };
                add::run_add_box(&cfg, new).await?;
            }
            AddTarget::Item {
                box_id,
                description,
                attrs,
                picture,
                theme,
            } => {
                let new = NewItem {
                    box_id,
                    height: attrs.height,
                    length: attrs.length,
                    weight: attrs.weight,
                    location: attrs.location,
                    picture,
                    tags: attrs.tags,
                    description: Some(description),
                };
                add::run_add_item(&cfg, new, theme.as_deref()).await?;
            }
        },
        Commands::Edit { target } => match target {
            EditTarget::Box {
                box_id,
                description,
                attrs,
                picture,
            } => {
                let patch = BoxPatch {
                    height: attrs.height,
                    length: attrs.length,
                    weight: attrs.weight,
                    location: attrs.location,
                    picture: edit::picture_patch(picture),
                    tags: attrs.tags,
                    description,
                };
                edit::run_edit_box(&cfg, box_id, patch).await?;
            }
            EditTarget::Item {
                item_id,
                description,
                attrs,
                picture,
            } => {
                let patch = ItemPatch {
                    height: attrs.height,
                    length: attrs.length,
                    weight: attrs.weight,
                    location: attrs.location,
                    picture: edit::picture_patch(picture),
                    tags: attrs.tags,
                    description,
                };
                edit::run_edit_item(&cfg, item_id, patch).await?;
            }
        },
        Commands::Delete { target } => match target {
            DeleteTarget::Box { box_id } => delete::run_delete_box(&cfg, box_id).await?,
            DeleteTarget::Item { item_id } => delete::run_delete_item(&cfg, item_id).await?,
        },
        Commands::Find { target } => match target {
            FindTarget::Boxes {
                location,
                weight,
                alias,
                text,
                json,
            } => {
                let filter = BoxFilter {
                    location,
                    weight,
                    alias,
                    text,
                };
                find::run_find_boxes(&cfg, filter, json).await?;
            }
            FindTarget::Items {
                box_id,
                location,
                alias,
                text,
                json,
            } => {
                let filter = ItemFilter {
                    box_id,
                    location,
                    alias,
                    text,
                };
                find::run_find_items(&cfg, filter, json).await?;
            }
            FindTarget::All { json } => find::run_find_all(&cfg, json).await?,
        },
        Commands::Themes { action } => match action {
            ThemesAction::List => themes::run_list_themes(&cfg)?,
            ThemesAction::Resolve { box_id } => themes::run_resolve_theme(&cfg, box_id).await?,
            ThemesAction::Next { kind, box_id } => {
                themes::run_next_alias(&cfg, kind.into(), box_id).await?
            }
        },
        Commands::Stats => stats::run_stats(&cfg).await?,
    }

    Ok(())
}
