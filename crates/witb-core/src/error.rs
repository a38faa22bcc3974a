//! Error types for theme loading, alias allocation, and theme resolution.
//!
//! Every variant is raised synchronously to the immediate caller. Nothing in
//! this crate recovers from them locally; the inventory service only retries
//! on [`AliasConflict`], which is a commit-time signal and not an allocation
//! failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::EntityKind;

/// Failures of the alias subsystem.
#[derive(Debug, Error)]
pub enum AliasError {
    /// The theme resource directory does not exist.
    #[error("alias directory not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// A theme resource exists but could not be interpreted.
    #[error("malformed theme source {}: {reason}", path.display())]
    MalformedThemeSource { path: PathBuf, reason: String },

    #[error("failed to read theme source {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested theme is not a catalog key.
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    /// The requested theme has no candidate words.
    #[error("no aliases available in theme '{0}'")]
    EmptyTheme(String),

    /// Theme resolution was asked to pick from an empty catalog.
    #[error("no valid theme found: catalog is empty")]
    NoThemeAvailable,

    /// The overflow search ran past its configured cap.
    #[error("{kind} alias space exhausted after {rounds} overflow rounds")]
    Exhausted { kind: EntityKind, rounds: u32 },
}

/// A store refused an insert because the alias is already assigned.
///
/// Stores return this wrapped in `anyhow::Error`; callers detect it with
/// `err.downcast_ref::<AliasConflict>()` and re-run allocation against a
/// fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} alias '{alias}' is already taken")]
pub struct AliasConflict {
    pub kind: EntityKind,
    pub alias: String,
}
