//! Inventory operations: create, edit, delete, and search boxes and items.
//!
//! This is where proposed aliases get committed. Allocation runs against an
//! [`AliasSnapshot`](crate::AliasSnapshot) taken from the store; the insert
//! is then guarded by the store's uniqueness constraint. If another writer
//! claimed the alias in between, the store reports
//! [`AliasConflict`] and the whole snapshot → allocate → insert sequence is
//! repeated, up to [`AliasSettings::commit_retries`] extra times.

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::alias::{
    alias_sort_key, resolve_theme, AliasAllocator, ThemeMatch, ThemeResolution,
    DEFAULT_MAX_OVERFLOW_ROUNDS,
};
use crate::error::{AliasConflict, AliasError};
use crate::models::{
    generate_qr_code, BoxFilter, BoxPatch, BoxRecord, EntityKind, ItemFilter, ItemPatch,
    ItemRecord, NewBox, NewItem,
};
use crate::store::Store;
use crate::theme::Catalog;

/// Tuning for allocation and commit.
#[derive(Debug, Clone)]
pub struct AliasSettings {
    pub max_overflow_rounds: u32,
    /// Extra attempts after an alias conflict at commit time.
    pub commit_retries: u32,
    pub theme_match: ThemeMatch,
    /// Theme passed to box allocation; the first theme alphabetically if unset.
    pub box_theme: Option<String>,
}

impl Default for AliasSettings {
    fn default() -> Self {
        Self {
            max_overflow_rounds: DEFAULT_MAX_OVERFLOW_ROUNDS,
            commit_retries: 3,
            theme_match: ThemeMatch::Prefix,
            box_theme: None,
        }
    }
}

/// A box with its items, for full listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BoxContents {
    #[serde(flatten)]
    pub record: BoxRecord,
    pub items: Vec<ItemRecord>,
}

pub struct Inventory<'a> {
    store: &'a dyn Store,
    catalog: &'a Catalog,
    settings: AliasSettings,
}

impl<'a> Inventory<'a> {
    pub fn new(store: &'a dyn Store, catalog: &'a Catalog, settings: AliasSettings) -> Self {
        Self {
            store,
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    fn allocator(&self) -> AliasAllocator<'a> {
        AliasAllocator::new(self.catalog).with_max_overflow_rounds(self.settings.max_overflow_rounds)
    }

    fn box_theme(&self) -> Result<String, AliasError> {
        match self.settings.box_theme {
            Some(ref theme) => Ok(theme.clone()),
            None => self
                .catalog
                .sorted_names()
                .first()
                .map(|name| name.to_string())
                .ok_or(AliasError::NoThemeAvailable),
        }
    }

    /// Propose the alias the next box would receive, without committing.
    pub async fn preview_box_alias(&self) -> Result<String> {
        let theme = self.box_theme()?;
        let snapshot = self.store.alias_snapshot().await?;
        Ok(self
            .allocator()
            .generate_unique_alias(&snapshot, EntityKind::Box, &theme)?)
    }

    /// Propose the alias the next item in `box_id` would receive.
    pub async fn preview_item_alias(&self, box_id: i64) -> Result<String> {
        let theme = self.find_theme_for_box(box_id).await?.theme;
        let snapshot = self.store.alias_snapshot().await?;
        Ok(self
            .allocator()
            .generate_unique_alias(&snapshot, EntityKind::Item, &theme)?)
    }

    pub async fn add_box(&self, new: NewBox) -> Result<BoxRecord> {
        let theme = self.box_theme()?;
        let qr_code = generate_qr_code();
        let mut attempt = 0;
        loop {
            let snapshot = self.store.alias_snapshot().await?;
            let alias = self
                .allocator()
                .generate_unique_alias(&snapshot, EntityKind::Box, &theme)?;
            debug!(alias = %alias, attempt, "proposed box alias");

            match self.store.insert_box(&new, &alias, &qr_code).await {
                Ok(record) => {
                    info!(id = record.id, alias = %record.alias, "box added");
                    return Ok(record);
                }
                Err(e) => self.check_retry(e, &mut attempt)?,
            }
        }
    }

    /// Add an item to its box. The item alias comes from `theme` if given,
    /// otherwise from the theme of the box's alias.
    pub async fn add_item(&self, new: NewItem, theme: Option<&str>) -> Result<ItemRecord> {
        let theme = match theme {
            Some(t) => t.to_string(),
            None => self.find_theme_for_box(new.box_id).await?.theme,
        };
        let mut attempt = 0;
        loop {
            let snapshot = self.store.alias_snapshot().await?;
            let alias = self
                .allocator()
                .generate_unique_alias(&snapshot, EntityKind::Item, &theme)?;
            debug!(alias = %alias, theme = %theme, attempt, "proposed item alias");

            match self.store.insert_item(&new, &alias).await {
                Ok(record) => {
                    info!(id = record.id, box_id = record.box_id, alias = %record.alias, "item added");
                    return Ok(record);
                }
                Err(e) => self.check_retry(e, &mut attempt)?,
            }
        }
    }

    /// Swallow an alias conflict while retries remain; propagate anything else.
    fn check_retry(&self, err: anyhow::Error, attempt: &mut u32) -> Result<()> {
        let Some(conflict) = err.downcast_ref::<AliasConflict>().cloned() else {
            return Err(err);
        };
        if *attempt >= self.settings.commit_retries {
            return Err(err.context(format!(
                "gave up after {} alias conflicts",
                *attempt + 1
            )));
        }
        warn!(
            "{} alias '{}' was taken concurrently, retrying",
            conflict.kind, conflict.alias
        );
        *attempt += 1;
        Ok(())
    }

    /// Theme the box's alias belongs to. Items inherit it.
    pub async fn find_theme_for_box(&self, box_id: i64) -> Result<ThemeResolution> {
        let record = self
            .store
            .get_box(box_id)
            .await?
            .ok_or_else(|| anyhow!("box not found: {}", box_id))?;
        let resolution = resolve_theme(&record.alias, self.catalog, self.settings.theme_match)?;
        debug!(box_id, alias = %record.alias, theme = %resolution.theme, "resolved box theme");
        Ok(resolution)
    }

    pub async fn edit_box(&self, id: i64, patch: &BoxPatch) -> Result<BoxRecord> {
        let record = self
            .store
            .update_box(id, patch)
            .await
            .with_context(|| format!("failed to update box {}", id))?;
        match record {
            Some(r) => {
                info!(id, alias = %r.alias, "box updated");
                Ok(r)
            }
            None => bail!("box not found: {}", id),
        }
    }

    pub async fn edit_item(&self, id: i64, patch: &ItemPatch) -> Result<ItemRecord> {
        let record = self
            .store
            .update_item(id, patch)
            .await
            .with_context(|| format!("failed to update item {}", id))?;
        match record {
            Some(r) => {
                info!(id, alias = %r.alias, "item updated");
                Ok(r)
            }
            None => bail!("item not found: {}", id),
        }
    }

    /// Delete a box and everything in it. Its alias becomes free again.
    pub async fn delete_box(&self, id: i64) -> Result<()> {
        if !self.store.delete_box(id).await? {
            bail!("box not found: {}", id);
        }
        info!(id, "box deleted");
        Ok(())
    }

    pub async fn delete_item(&self, id: i64) -> Result<()> {
        if !self.store.delete_item(id).await? {
            bail!("item not found: {}", id);
        }
        info!(id, "item deleted");
        Ok(())
    }

    pub async fn find_boxes(&self, filter: &BoxFilter) -> Result<Vec<BoxRecord>> {
        self.store.find_boxes(filter).await
    }

    pub async fn find_items(&self, filter: &ItemFilter) -> Result<Vec<ItemRecord>> {
        self.store.find_items(filter).await
    }

    /// Every box in natural alias order (`animals`, `animals02`, `colors`),
    /// each with its items in id order.
    pub async fn list_all(&self) -> Result<Vec<BoxContents>> {
        let mut boxes = self.store.find_boxes(&BoxFilter::default()).await?;
        boxes.sort_by_key(|b| alias_sort_key(&b.alias));

        let mut items = self.store.find_items(&ItemFilter::default()).await?;
        items.sort_by_key(|i| i.id);

        Ok(boxes
            .into_iter()
            .map(|record| {
                let contents = items
                    .iter()
                    .filter(|i| i.box_id == record.id)
                    .cloned()
                    .collect();
                BoxContents {
                    record,
                    items: contents,
                }
            })
            .collect())
    }
}
