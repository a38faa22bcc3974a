//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/witb.sqlite"
//!
//! [aliases]
//! dir = "./assets/alias"
//! max_overflow_rounds = 10000
//! commit_retries = 3
//! theme_match = "prefix"      # or "exact-segment"
//! # box_theme = "animals"
//!
//! [logging]
//! level = "warn"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use witb_core::alias::DEFAULT_MAX_OVERFLOW_ROUNDS;
use witb_core::{AliasSettings, ThemeMatch};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub aliases: AliasConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AliasConfig {
    /// Directory holding `alias_<theme>.csv` files.
    #[serde(default = "default_alias_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_max_overflow_rounds")]
    pub max_overflow_rounds: u32,
    #[serde(default = "default_commit_retries")]
    pub commit_retries: u32,
    #[serde(default)]
    pub theme_match: ThemeMatchConfig,
    #[serde(default)]
    pub box_theme: Option<String>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            dir: default_alias_dir(),
            max_overflow_rounds: default_max_overflow_rounds(),
            commit_retries: default_commit_retries(),
            theme_match: ThemeMatchConfig::default(),
            box_theme: None,
        }
    }
}

fn default_alias_dir() -> PathBuf {
    PathBuf::from("./assets/alias")
}
fn default_max_overflow_rounds() -> u32 {
    DEFAULT_MAX_OVERFLOW_ROUNDS
}
fn default_commit_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMatchConfig {
    #[default]
    Prefix,
    ExactSegment,
}

impl From<ThemeMatchConfig> for ThemeMatch {
    fn from(value: ThemeMatchConfig) -> Self {
        match value {
            ThemeMatchConfig::Prefix => ThemeMatch::Prefix,
            ThemeMatchConfig::ExactSegment => ThemeMatch::ExactSegment,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

impl Config {
    pub fn alias_settings(&self) -> AliasSettings {
        AliasSettings {
            max_overflow_rounds: self.aliases.max_overflow_rounds,
            commit_retries: self.aliases.commit_retries,
            theme_match: self.aliases.theme_match.into(),
            box_theme: self.aliases.box_theme.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.aliases.max_overflow_rounds == 0 {
        anyhow::bail!("aliases.max_overflow_rounds must be >= 1");
    }

    if let Some(ref theme) = config.aliases.box_theme {
        if theme.trim().is_empty() {
            anyhow::bail!("aliases.box_theme must not be empty when set");
        }
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        anyhow::bail!(
            "Unknown logging.level: '{}'. Must be one of {}.",
            config.logging.level,
            LOG_LEVELS.join(", ")
        );
    }

    Ok(config)
}
