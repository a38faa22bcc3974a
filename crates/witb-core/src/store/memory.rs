//! In-memory [`Store`] implementation for tests and embedding.
//!
//! Uses `BTreeMap`s behind a single `std::sync::RwLock` so alias checks and
//! inserts happen atomically, like a UNIQUE column would.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::alias::AliasSnapshot;
use crate::error::AliasConflict;
use crate::models::{
    BoxFilter, BoxPatch, BoxRecord, EntityKind, ItemFilter, ItemPatch, ItemRecord, NewBox,
    NewItem,
};

use super::Store;

#[derive(Default)]
struct Tables {
    boxes: BTreeMap<i64, BoxRecord>,
    items: BTreeMap<i64, ItemRecord>,
    next_box_id: i64,
    next_item_id: i64,
}

/// In-memory store for tests and embedding.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_box(&self, new: &NewBox, alias: &str, qr_code: &str) -> Result<BoxRecord> {
        let mut tables = self.tables.write().unwrap();
        if tables.boxes.values().any(|b| b.alias == alias) {
            return Err(AliasConflict {
                kind: EntityKind::Box,
                alias: alias.to_string(),
            }
            .into());
        }
        if tables.boxes.values().any(|b| b.qr_code == qr_code) {
            bail!("qr code already in use: {}", qr_code);
        }
        tables.next_box_id += 1;
        let record = BoxRecord {
            id: tables.next_box_id,
            alias: alias.to_string(),
            qr_code: qr_code.to_string(),
            height: new.height,
            length: new.length,
            weight: new.weight,
            location: new.location.clone(),
            picture: new.picture.clone(),
            tags: new.tags.clone(),
            description: new.description.clone(),
            created_at: now_ts(),
        };
        tables.boxes.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_box(&self, id: i64) -> Result<Option<BoxRecord>> {
        Ok(self.tables.read().unwrap().boxes.get(&id).cloned())
    }

    async fn update_box(&self, id: i64, patch: &BoxPatch) -> Result<Option<BoxRecord>> {
        let mut tables = self.tables.write().unwrap();
        Ok(tables.boxes.get_mut(&id).map(|record| {
            patch.apply(record);
            record.clone()
        }))
    }

    async fn delete_box(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().unwrap();
        if tables.boxes.remove(&id).is_none() {
            return Ok(false);
        }
        tables.items.retain(|_, item| item.box_id != id);
        Ok(true)
    }

    async fn find_boxes(&self, filter: &BoxFilter) -> Result<Vec<BoxRecord>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .boxes
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    async fn insert_item(&self, new: &NewItem, alias: &str) -> Result<ItemRecord> {
        let mut tables = self.tables.write().unwrap();
        if !tables.boxes.contains_key(&new.box_id) {
            bail!("box not found: {}", new.box_id);
        }
        if tables.items.values().any(|i| i.alias == alias) {
            return Err(AliasConflict {
                kind: EntityKind::Item,
                alias: alias.to_string(),
            }
            .into());
        }
        tables.next_item_id += 1;
        let record = ItemRecord {
            id: tables.next_item_id,
            box_id: new.box_id,
            alias: alias.to_string(),
            height: new.height,
            length: new.length,
            weight: new.weight,
            location: new.location.clone(),
            picture: new.picture.clone(),
            tags: new.tags.clone(),
            description: new.description.clone(),
            created_at: now_ts(),
        };
        tables.items.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_item(&self, id: i64) -> Result<Option<ItemRecord>> {
        Ok(self.tables.read().unwrap().items.get(&id).cloned())
    }

    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<ItemRecord>> {
        let mut tables = self.tables.write().unwrap();
        Ok(tables.items.get_mut(&id).map(|record| {
            patch.apply(record);
            record.clone()
        }))
    }

    async fn delete_item(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().unwrap().items.remove(&id).is_some())
    }

    async fn find_items(&self, filter: &ItemFilter) -> Result<Vec<ItemRecord>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .items
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn alias_snapshot(&self) -> Result<AliasSnapshot> {
        let tables = self.tables.read().unwrap();
        Ok(AliasSnapshot {
            boxes: tables.boxes.values().map(|b| b.alias.clone()).collect(),
            items: tables.items.values().map(|i| i.alias.clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_box(description: &str) -> NewBox {
        NewBox {
            description: Some(description.into()),
            location: Some("Garage".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_box() {
        let store = InMemoryStore::new();
        let b = store.insert_box(&new_box("tools"), "animals", "AAAA000001").await.unwrap();
        assert_eq!(b.id, 1);
        let fetched = store.get_box(b.id).await.unwrap().unwrap();
        assert_eq!(fetched, b);
    }

    #[tokio::test]
    async fn test_duplicate_box_alias_is_conflict() {
        let store = InMemoryStore::new();
        store.insert_box(&new_box("a"), "animals", "AAAA000001").await.unwrap();
        let err = store
            .insert_box(&new_box("b"), "animals", "AAAA000002")
            .await
            .unwrap_err();
        let conflict = err.downcast_ref::<AliasConflict>().unwrap();
        assert_eq!(conflict.kind, EntityKind::Box);
        assert_eq!(conflict.alias, "animals");
    }

    #[tokio::test]
    async fn test_item_requires_box() {
        let store = InMemoryStore::new();
        let item = NewItem {
            box_id: 42,
            ..Default::default()
        };
        let err = store.insert_item(&item, "cat").await.unwrap_err();
        assert!(err.downcast_ref::<AliasConflict>().is_none());
        assert!(err.to_string().contains("box not found"));
    }

    #[tokio::test]
    async fn test_delete_box_removes_items() {
        let store = InMemoryStore::new();
        let b = store.insert_box(&new_box("a"), "animals", "AAAA000001").await.unwrap();
        let item = NewItem {
            box_id: b.id,
            ..Default::default()
        };
        store.insert_item(&item, "cat").await.unwrap();
        store.insert_item(&item, "dog").await.unwrap();

        assert!(store.delete_box(b.id).await.unwrap());
        assert!(!store.delete_box(b.id).await.unwrap());
        let snapshot = store.alias_snapshot().await.unwrap();
        assert!(snapshot.boxes.is_empty());
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_item_is_none() {
        let store = InMemoryStore::new();
        let patch = ItemPatch {
            location: Some("Bottom".into()),
            ..Default::default()
        };
        assert!(store.update_item(7, &patch).await.unwrap().is_none());
    }
}
