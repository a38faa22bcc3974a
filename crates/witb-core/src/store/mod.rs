//! Storage abstraction for boxes and items.
//!
//! The [`Store`] trait is the persistence boundary of the inventory: the
//! SQLite backend lives in the native crate, [`memory::InMemoryStore`] here.
//!
//! Implementations must enforce alias uniqueness per [`EntityKind`] at insert
//! time and report a violation as [`AliasConflict`](crate::AliasConflict)
//! wrapped in `anyhow::Error`. That constraint is what makes the
//! propose-then-commit allocation in [`crate::inventory`] safe.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::alias::AliasSnapshot;
use crate::models::{
    BoxFilter, BoxPatch, BoxRecord, ItemFilter, ItemPatch, ItemRecord, NewBox, NewItem,
};

/// Abstract storage backend for boxes and items.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert_box`](Store::insert_box) | Create a box under a proposed alias |
/// | [`update_box`](Store::update_box) | Apply a partial edit |
/// | [`delete_box`](Store::delete_box) | Remove a box and its items |
/// | [`find_boxes`](Store::find_boxes) | Filtered listing, id order |
/// | [`insert_item`](Store::insert_item) | Create an item under a proposed alias |
/// | [`alias_snapshot`](Store::alias_snapshot) | Every taken alias, for allocation |
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a box. Fails with `AliasConflict` if `alias` is taken.
    async fn insert_box(&self, new: &NewBox, alias: &str, qr_code: &str) -> Result<BoxRecord>;

    async fn get_box(&self, id: i64) -> Result<Option<BoxRecord>>;

    /// Returns the updated record, or `None` if the box does not exist.
    async fn update_box(&self, id: i64, patch: &BoxPatch) -> Result<Option<BoxRecord>>;

    /// Delete a box together with its items. Returns `false` if absent.
    async fn delete_box(&self, id: i64) -> Result<bool>;

    async fn find_boxes(&self, filter: &BoxFilter) -> Result<Vec<BoxRecord>>;

    /// Insert an item. Fails if the box does not exist, or with
    /// `AliasConflict` if `alias` is taken.
    async fn insert_item(&self, new: &NewItem, alias: &str) -> Result<ItemRecord>;

    async fn get_item(&self, id: i64) -> Result<Option<ItemRecord>>;

    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<ItemRecord>>;

    async fn delete_item(&self, id: i64) -> Result<bool>;

    async fn find_items(&self, filter: &ItemFilter) -> Result<Vec<ItemRecord>>;

    /// Every alias currently assigned, per kind.
    async fn alias_snapshot(&self) -> Result<AliasSnapshot>;
}
