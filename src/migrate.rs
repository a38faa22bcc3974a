//! Database schema migrations (idempotent).
//!
//! Alias columns carry UNIQUE constraints: they are the commit-time guard
//! that turns a racing duplicate allocation into a retryable conflict.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create the `boxes` and `items` tables and their indexes on `pool`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS boxes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            alias TEXT NOT NULL UNIQUE,
            qr_code TEXT NOT NULL UNIQUE,
            height REAL,
            length REAL,
            weight REAL,
            location TEXT,
            picture TEXT,
            tags TEXT,
            description TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            box_id INTEGER NOT NULL,
            alias TEXT NOT NULL UNIQUE,
            height REAL,
            length REAL,
            weight REAL,
            location TEXT,
            picture TEXT,
            tags TEXT,
            description TEXT,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (box_id) REFERENCES boxes(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_box_id ON items(box_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_boxes_location ON boxes(location)")
        .execute(pool)
        .await?;

    info!("schema up to date");
    Ok(())
}
