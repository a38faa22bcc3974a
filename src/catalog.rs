//! Theme catalog loading for the configured alias directory.

use anyhow::{Context, Result};
use tracing::debug;

use witb_core::{load_aliases, Catalog};

use crate::config::Config;

/// Load the theme catalog from `[aliases].dir`.
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    let dir = &config.aliases.dir;
    let catalog = load_aliases(dir)
        .with_context(|| format!("Failed to load alias themes from {}", dir.display()))?;
    debug!(themes = catalog.len(), dir = %dir.display(), "theme catalog loaded");
    Ok(catalog)
}
