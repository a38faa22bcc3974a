//! SQLite-backed [`Store`] implementation.
//!
//! Maps each [`Store`] operation onto the `boxes` / `items` schema created by
//! [`crate::migrate`]. UNIQUE violations on an `alias` column surface as
//! [`AliasConflict`] so the inventory layer can retry allocation.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::info;

use witb_core::error::AliasConflict;
use witb_core::models::{
    BoxFilter, BoxPatch, BoxRecord, EntityKind, ItemFilter, ItemPatch, ItemRecord, NewBox,
    NewItem,
};
use witb_core::store::Store;
use witb_core::AliasSnapshot;

use crate::config::Config;
use crate::{db, migrate};

const BOX_COLUMNS: &str = "id, alias, qr_code, height, length, weight, location, picture, tags, description, created_at";
const ITEM_COLUMNS: &str = "id, box_id, alias, height, length, weight, location, picture, tags, description, created_at";

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date on the same pool.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::run_migrations(&pool).await?;
        info!(path = %config.db.path.display(), "database opened");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

fn box_from_row(row: &SqliteRow) -> BoxRecord {
    BoxRecord {
        id: row.get("id"),
        alias: row.get("alias"),
        qr_code: row.get("qr_code"),
        height: row.get("height"),
        length: row.get("length"),
        weight: row.get("weight"),
        location: row.get("location"),
        picture: row.get("picture"),
        tags: row.get("tags"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

fn item_from_row(row: &SqliteRow) -> ItemRecord {
    ItemRecord {
        id: row.get("id"),
        box_id: row.get("box_id"),
        alias: row.get("alias"),
        height: row.get("height"),
        length: row.get("length"),
        weight: row.get("weight"),
        location: row.get("location"),
        picture: row.get("picture"),
        tags: row.get("tags"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

/// Translate a UNIQUE violation on `<table>.alias` into [`AliasConflict`].
fn map_insert_error(err: sqlx::Error, kind: EntityKind, alias: &str) -> anyhow::Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() && db_err.message().contains(".alias") {
            return AliasConflict {
                kind,
                alias: alias.to_string(),
            }
            .into();
        }
    }
    err.into()
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_box(&self, new: &NewBox, alias: &str, qr_code: &str) -> Result<BoxRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO boxes (alias, qr_code, height, length, weight, location,
                               picture, tags, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(alias)
        .bind(qr_code)
        .bind(new.height)
        .bind(new.length)
        .bind(new.weight)
        .bind(&new.location)
        .bind(&new.picture)
        .bind(&new.tags)
        .bind(&new.description)
        .bind(now_ts())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, EntityKind::Box, alias))?;

        let id = result.last_insert_rowid();
        match self.get_box(id).await? {
            Some(record) => Ok(record),
            None => bail!("box {} vanished after insert", id),
        }
    }

    async fn get_box(&self, id: i64) -> Result<Option<BoxRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM boxes WHERE id = ?", BOX_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(box_from_row))
    }

    async fn update_box(&self, id: i64, patch: &BoxPatch) -> Result<Option<BoxRecord>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {} FROM boxes WHERE id = ?", BOX_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut record) = row.as_ref().map(box_from_row) else {
            return Ok(None);
        };
        patch.apply(&mut record);

        sqlx::query(
            r#"
            UPDATE boxes SET height = ?, length = ?, weight = ?, location = ?,
                             picture = ?, tags = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(record.height)
        .bind(record.length)
        .bind(record.weight)
        .bind(&record.location)
        .bind(&record.picture)
        .bind(&record.tags)
        .bind(&record.description)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn delete_box(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items WHERE box_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM boxes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_boxes(&self, filter: &BoxFilter) -> Result<Vec<BoxRecord>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM boxes WHERE 1 = 1", BOX_COLUMNS));
        if let Some(ref location) = filter.location {
            qb.push(" AND location = ").push_bind(location.clone());
        }
        if let Some(weight) = filter.weight {
            qb.push(" AND weight = ").push_bind(weight);
        }
        if let Some(ref alias) = filter.alias {
            qb.push(" AND alias = ").push_bind(alias.clone());
        }
        qb.push(" ORDER BY id ASC");

        // SQLite's LOWER and LIKE only fold ASCII and treat `%`/`_` as
        // wildcards, so the text criterion is matched on the decoded rows.
        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(box_from_row)
            .filter(|r| filter.matches(r))
            .collect())
    }

    async fn insert_item(&self, new: &NewItem, alias: &str) -> Result<ItemRecord> {
        let mut tx = self.pool.begin().await?;

        let box_exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM boxes WHERE id = ?")
            .bind(new.box_id)
            .fetch_one(&mut *tx)
            .await?;
        if !box_exists {
            bail!("box not found: {}", new.box_id);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO items (box_id, alias, height, length, weight, location,
                               picture, tags, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.box_id)
        .bind(alias)
        .bind(new.height)
        .bind(new.length)
        .bind(new.weight)
        .bind(&new.location)
        .bind(&new.picture)
        .bind(&new.tags)
        .bind(&new.description)
        .bind(now_ts())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, EntityKind::Item, alias))?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        match self.get_item(id).await? {
            Some(record) => Ok(record),
            None => bail!("item {} vanished after insert", id),
        }
    }

    async fn get_item(&self, id: i64) -> Result<Option<ItemRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(item_from_row))
    }

    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Option<ItemRecord>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut record) = row.as_ref().map(item_from_row) else {
            return Ok(None);
        };
        patch.apply(&mut record);

        sqlx::query(
            r#"
            UPDATE items SET height = ?, length = ?, weight = ?, location = ?,
                             picture = ?, tags = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(record.height)
        .bind(record.length)
        .bind(record.weight)
        .bind(&record.location)
        .bind(&record.picture)
        .bind(&record.tags)
        .bind(&record.description)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn delete_item(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_items(&self, filter: &ItemFilter) -> Result<Vec<ItemRecord>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM items WHERE 1 = 1", ITEM_COLUMNS));
        if let Some(box_id) = filter.box_id {
            qb.push(" AND box_id = ").push_bind(box_id);
        }
        if let Some(ref location) = filter.location {
            qb.push(" AND location = ").push_bind(location.clone());
        }
        if let Some(ref alias) = filter.alias {
            qb.push(" AND alias = ").push_bind(alias.clone());
        }
        qb.push(" ORDER BY id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(item_from_row)
            .filter(|r| filter.matches(r))
            .collect())
    }

    async fn alias_snapshot(&self) -> Result<AliasSnapshot> {
        let boxes: Vec<String> = sqlx::query_scalar("SELECT alias FROM boxes")
            .fetch_all(&self.pool)
            .await?;
        let items: Vec<String> = sqlx::query_scalar("SELECT alias FROM items")
            .fetch_all(&self.pool)
            .await?;
        Ok(AliasSnapshot {
            boxes: boxes.into_iter().collect(),
            items: items.into_iter().collect(),
        })
    }
}
