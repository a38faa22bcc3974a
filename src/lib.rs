//! # What's In The Box
//!
//! Catalogue physical storage boxes and the items inside them under
//! human-memorable, collision-free aliases.
//!
//! Boxes are named after themes (`animals`, `colors`, …) and items after the
//! words of their box's theme (`cat`, `dog`, …). When a theme runs out,
//! aliases overflow into numbered variants (`animals02`, `cat02`). The alias
//! engine itself lives in [`witb_core`]; this crate adds SQLite persistence,
//! configuration, and the `witb` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ assets/alias │──▶│  witb-core   │──▶│    SQLite    │
//! │  theme CSVs  │   │ alias engine │   │ boxes, items │
//! └──────────────┘   └──────┬───────┘   └──────────────┘
//!                           │
//!                      ┌────▼─────┐
//!                      │   CLI    │
//!                      │  (witb)  │
//!                      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! witb init                                   # create database
//! witb add box --description "Winter clothes" # → alias "animals"
//! witb add item --box-id 1 --description "Scarf"
//! witb find all
//! witb themes next box
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`catalog`] | Theme catalog loading from the configured directory |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite implementation of the core `Store` trait |
//! | [`add`] | `witb add box|item` |
//! | [`edit`] | `witb edit box|item` |
//! | [`delete`] | `witb delete box|item` |
//! | [`find`] | `witb find boxes|items|all` |
//! | [`themes`] | Theme listing, resolution, and alias previews |
//! | [`stats`] | Inventory counts and per-theme usage |

pub mod add;
pub mod catalog;
pub mod config;
pub mod db;
pub mod delete;
pub mod edit;
pub mod find;
pub mod migrate;
pub mod sqlite_store;
pub mod stats;
pub mod themes;

pub use witb_core::{models, store};
