//! Alias allocation and theme resolution.
//!
//! Boxes are named after whole themes (`animals`, `colors`, …); items are
//! named after words of their box's theme (`cat`, `dog`, …). When every base
//! candidate is taken, allocation overflows into two-digit suffixes starting
//! at 2: `animals02`, `colors02`, `animals03`, ….
//!
//! The allocator only *proposes* a candidate. It never reserves it; the
//! caller must commit the alias under a store-level uniqueness constraint
//! and re-run allocation on conflict (see [`crate::inventory`]).

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::AliasError;
use crate::models::EntityKind;
use crate::theme::Catalog;

/// Default number of overflow counter values tried before giving up.
pub const DEFAULT_MAX_OVERFLOW_ROUNDS: u32 = 10_000;

/// First counter used for suffixed aliases.
const FIRST_SUFFIX: u32 = 2;

/// Answers "is `alias` already assigned to an entity of `kind`?".
pub trait AliasOracle {
    fn alias_exists(&self, alias: &str, kind: EntityKind) -> bool;
}

impl<F> AliasOracle for F
where
    F: Fn(&str, EntityKind) -> bool,
{
    fn alias_exists(&self, alias: &str, kind: EntityKind) -> bool {
        self(alias, kind)
    }
}

/// Point-in-time copy of every taken alias, per kind.
#[derive(Debug, Clone, Default)]
pub struct AliasSnapshot {
    pub boxes: HashSet<String>,
    pub items: HashSet<String>,
}

impl AliasSnapshot {
    pub fn insert(&mut self, kind: EntityKind, alias: impl Into<String>) -> bool {
        match kind {
            EntityKind::Box => self.boxes.insert(alias.into()),
            EntityKind::Item => self.items.insert(alias.into()),
        }
    }
}

impl AliasOracle for AliasSnapshot {
    fn alias_exists(&self, alias: &str, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Box => self.boxes.contains(alias),
            EntityKind::Item => self.items.contains(alias),
        }
    }
}

/// Format an overflow candidate: `tiger` + 2 → `tiger02`.
pub fn suffixed(base: &str, counter: u32) -> String {
    format!("{}{:02}", base, counter)
}

/// Proposes fresh aliases from a [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct AliasAllocator<'a> {
    catalog: &'a Catalog,
    max_overflow_rounds: u32,
}

impl<'a> AliasAllocator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            max_overflow_rounds: DEFAULT_MAX_OVERFLOW_ROUNDS,
        }
    }

    pub fn with_max_overflow_rounds(mut self, rounds: u32) -> Self {
        self.max_overflow_rounds = rounds;
        self
    }

    /// Propose an unused alias for a new entity of `kind`.
    ///
    /// `theme` must name a non-empty catalog theme for both kinds. Items draw
    /// from that theme's words; boxes ignore it beyond validation and draw
    /// from the catalog's theme names.
    pub fn generate_unique_alias<O>(
        &self,
        oracle: &O,
        kind: EntityKind,
        theme: &str,
    ) -> Result<String, AliasError>
    where
        O: AliasOracle + ?Sized,
    {
        let entry = self
            .catalog
            .get(theme)
            .ok_or_else(|| AliasError::UnknownTheme(theme.to_string()))?;
        if entry.words.is_empty() {
            return Err(AliasError::EmptyTheme(theme.to_string()));
        }

        match kind {
            EntityKind::Box => self.find_next_available_theme(oracle),
            EntityKind::Item => {
                let words: Vec<&str> = entry.words.iter().map(String::as_str).collect();
                self.first_free(oracle, kind, &words)
            }
        }
    }

    /// Propose the alphabetically first free theme name as a box alias,
    /// overflowing into suffixed theme names once all are taken.
    pub fn find_next_available_theme<O>(&self, oracle: &O) -> Result<String, AliasError>
    where
        O: AliasOracle + ?Sized,
    {
        if self.catalog.is_empty() {
            return Err(AliasError::NoThemeAvailable);
        }
        let names = self.catalog.sorted_names();
        self.first_free(oracle, EntityKind::Box, &names)
    }

    /// Scan `bases` in order, then `base02`, `base03`, … round by round.
    fn first_free<O>(
        &self,
        oracle: &O,
        kind: EntityKind,
        bases: &[&str],
    ) -> Result<String, AliasError>
    where
        O: AliasOracle + ?Sized,
    {
        for base in bases {
            if !oracle.alias_exists(base, kind) {
                return Ok(base.to_string());
            }
        }
        debug!(%kind, candidates = bases.len(), "base aliases exhausted, using suffixes");

        let last = FIRST_SUFFIX.saturating_add(self.max_overflow_rounds);
        for counter in FIRST_SUFFIX..last {
            for base in bases {
                let candidate = suffixed(base, counter);
                if !oracle.alias_exists(&candidate, kind) {
                    return Ok(candidate);
                }
            }
        }

        Err(AliasError::Exhausted {
            kind,
            rounds: self.max_overflow_rounds,
        })
    }
}

/// How a box alias is mapped back to its theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMatch {
    /// First theme (catalog order) that is a literal prefix of the alias.
    #[default]
    Prefix,
    /// Alias must be the theme name, optionally followed by digits only.
    ExactSegment,
}

/// Whether a resolved theme came from a real match or the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Matched,
    /// No theme matched; the lexicographically last theme was returned.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResolution {
    pub theme: String,
    pub source: ResolutionSource,
}

impl ThemeResolution {
    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Fallback
    }
}

/// Recover the theme a box alias was drawn from.
///
/// Never fails for a non-empty catalog: when nothing matches, the
/// lexicographically last theme is returned with
/// [`ResolutionSource::Fallback`].
pub fn resolve_theme(
    alias: &str,
    catalog: &Catalog,
    mode: ThemeMatch,
) -> Result<ThemeResolution, AliasError> {
    let matched = catalog.iter().find(|theme| match mode {
        ThemeMatch::Prefix => alias.starts_with(theme.name.as_str()),
        ThemeMatch::ExactSegment => alias
            .strip_prefix(theme.name.as_str())
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit())),
    });

    if let Some(theme) = matched {
        return Ok(ThemeResolution {
            theme: theme.name.clone(),
            source: ResolutionSource::Matched,
        });
    }

    let fallback = catalog
        .sorted_names()
        .into_iter()
        .rev()
        .find(|name| catalog.contains(name))
        .ok_or(AliasError::NoThemeAvailable)?;
    warn!(
        "no theme matches alias '{}', falling back to '{}'",
        alias, fallback
    );
    Ok(ThemeResolution {
        theme: fallback.to_string(),
        source: ResolutionSource::Fallback,
    })
}

/// Split an alias into its base and optional numeric suffix:
/// `animals02` → (`animals`, `Some(2)`).
///
/// Suffixes are always at least two digits wide, so a single trailing digit
/// belongs to the base (`mp3` stays whole).
pub fn split_alias(alias: &str) -> (&str, Option<u32>) {
    let base = alias.trim_end_matches(|c: char| c.is_ascii_digit());
    if alias.len() - base.len() < 2 || base.is_empty() {
        return (alias, None);
    }
    match alias[base.len()..].parse() {
        Ok(n) => (base, Some(n)),
        Err(_) => (alias, None),
    }
}

/// Natural ordering key: base alias first, then suffix (unsuffixed first).
pub fn alias_sort_key(alias: &str) -> (String, u32) {
    let (base, counter) = split_alias(alias);
    (base.to_string(), counter.unwrap_or(0))
}
