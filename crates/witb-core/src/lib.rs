//! # What's In The Box Core
//!
//! Storage-agnostic logic for cataloguing storage boxes and the items inside
//! them: theme catalogs, alias allocation, theme resolution, the store
//! abstraction, and the inventory service that commits aliases.
//!
//! This crate contains no tokio, sqlx, or other runtime-specific
//! dependencies. Native persistence lives in the `whats-in-the-box` crate.
//!
//! ## Alias flow
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//! │ assets/alias │──▶│    Catalog     │──▶│  Allocator   │──▶ alias
//! │  *.csv       │   │ theme → words  │   │  + Resolver  │
//! └──────────────┘   └────────────────┘   └──────┬───────┘
//!                                                │ alias_exists?
//!                                          ┌─────▼──────┐
//!                                          │   Store    │
//!                                          └────────────┘
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`theme`] | Theme catalog loading and normalization |
//! | [`alias`] | Alias allocation, overflow suffixes, theme resolution |
//! | [`models`] | Box and item records, creation/edit/filter inputs |
//! | [`store`] | Async `Store` trait and in-memory implementation |
//! | [`inventory`] | Allocation + commit with conflict retry |
//! | [`error`] | Error taxonomy |

pub mod alias;
pub mod error;
pub mod inventory;
pub mod models;
pub mod store;
pub mod theme;

pub use alias::{
    resolve_theme, AliasAllocator, AliasOracle, AliasSnapshot, ResolutionSource, ThemeMatch,
    ThemeResolution,
};
pub use error::{AliasConflict, AliasError};
pub use inventory::{AliasSettings, Inventory};
pub use models::EntityKind;
pub use theme::{load_aliases, normalize_theme_name, Catalog, Theme};
