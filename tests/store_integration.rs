//! Integration tests for the SQLite store.
//!
//! These drive [`SqliteStore`] directly and through the core `Inventory`,
//! proving that the schema's UNIQUE alias columns surface as retryable
//! conflicts and that box deletion cascades.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use whats_in_the_box::config::{load_config, Config};
use whats_in_the_box::models::{BoxFilter, BoxPatch, ItemFilter, NewBox, NewItem};
use whats_in_the_box::sqlite_store::SqliteStore;
use whats_in_the_box::store::memory::InMemoryStore;
use whats_in_the_box::store::Store;
use whats_in_the_box::{db, migrate};
use witb_core::{AliasConflict, AliasSettings, Catalog, EntityKind, Inventory};

fn test_config() -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    let path: PathBuf = tmp.path().join("witb.toml");
    fs::write(
        &path,
        format!(
            "[db]\npath = \"{}/data/witb.sqlite\"\n",
            tmp.path().display()
        ),
    )
    .unwrap();
    let config = load_config(&path).unwrap();
    (tmp, config)
}

fn catalog() -> Catalog {
    Catalog::from_themes([
        ("animals", vec!["dog", "cat"]),
        ("colors", vec!["red", "blue"]),
    ])
}

fn new_box(description: &str) -> NewBox {
    NewBox {
        description: Some(description.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_duplicate_alias_is_alias_conflict() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();

    store
        .insert_box(&new_box("first"), "animals", "QR00000001")
        .await
        .unwrap();
    let err = store
        .insert_box(&new_box("second"), "animals", "QR00000002")
        .await
        .unwrap_err();

    let conflict = err
        .downcast_ref::<AliasConflict>()
        .expect("expected an alias conflict");
    assert_eq!(conflict.kind, EntityKind::Box);
    assert_eq!(conflict.alias, "animals");
}

#[tokio::test]
async fn test_duplicate_qr_code_is_not_alias_conflict() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();

    store
        .insert_box(&new_box("first"), "animals", "QR00000001")
        .await
        .unwrap();
    let err = store
        .insert_box(&new_box("second"), "colors", "QR00000001")
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<AliasConflict>().is_none());
}

#[tokio::test]
async fn test_item_aliases_unique_across_boxes() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();
    let a = store.insert_box(&new_box("a"), "animals", "QRA").await.unwrap();
    let b = store.insert_box(&new_box("b"), "colors", "QRB").await.unwrap();

    let item = |box_id| NewItem {
        box_id,
        ..Default::default()
    };
    store.insert_item(&item(a.id), "cat").await.unwrap();
    let err = store.insert_item(&item(b.id), "cat").await.unwrap_err();
    assert!(err.downcast_ref::<AliasConflict>().is_some());

    // Boxes and items are separate namespaces.
    store.insert_item(&item(b.id), "animals").await.unwrap();
}

#[tokio::test]
async fn test_insert_item_into_missing_box() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();

    let err = store
        .insert_item(
            &NewItem {
                box_id: 7,
                ..Default::default()
            },
            "cat",
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("box not found: 7"));
}

#[tokio::test]
async fn test_delete_box_cascades_to_items() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();
    let record = store.insert_box(&new_box("a"), "animals", "QRA").await.unwrap();
    store
        .insert_item(
            &NewItem {
                box_id: record.id,
                ..Default::default()
            },
            "cat",
        )
        .await
        .unwrap();

    assert!(store.delete_box(record.id).await.unwrap());
    assert!(!store.delete_box(record.id).await.unwrap());

    let items = store.find_items(&ItemFilter::default()).await.unwrap();
    assert!(items.is_empty());
    let snapshot = store.alias_snapshot().await.unwrap();
    assert!(snapshot.boxes.is_empty());
    assert!(snapshot.items.is_empty());
}

#[tokio::test]
async fn test_update_box_patch() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();
    let record = store
        .insert_box(
            &NewBox {
                picture: Some("old.jpg".to_string()),
                weight: Some(2.5),
                ..Default::default()
            },
            "animals",
            "QRA",
        )
        .await
        .unwrap();

    let patch = BoxPatch {
        location: Some("Garage".to_string()),
        picture: Some(None),
        ..Default::default()
    };
    let updated = store.update_box(record.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.location.as_deref(), Some("Garage"));
    assert_eq!(updated.picture, None);
    assert_eq!(updated.weight, Some(2.5));

    assert!(store.update_box(999, &patch).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_boxes_text_filter() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();
    store
        .insert_box(
            &NewBox {
                tags: Some("Seasonal,Winter".to_string()),
                ..Default::default()
            },
            "animals",
            "QRA",
        )
        .await
        .unwrap();
    store
        .insert_box(&new_box("Cables"), "colors", "QRB")
        .await
        .unwrap();

    let filter = BoxFilter {
        text: Some("winter".to_string()),
        ..Default::default()
    };
    let found = store.find_boxes(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].alias, "animals");
}

#[tokio::test]
async fn test_inventory_end_to_end() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();
    let catalog = catalog();
    let inventory = Inventory::new(&store, &catalog, AliasSettings::default());

    let aliases = [
        inventory.add_box(new_box("a")).await.unwrap().alias,
        inventory.add_box(new_box("b")).await.unwrap().alias,
        inventory.add_box(new_box("c")).await.unwrap().alias,
    ];
    assert_eq!(aliases, ["animals", "colors", "animals02"]);

    let third = inventory
        .find_boxes(&BoxFilter {
            alias: Some("animals02".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let item = inventory
        .add_item(
            NewItem {
                box_id: third[0].id,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(item.alias, "cat");

    let all = inventory.list_all().await.unwrap();
    let order: Vec<&str> = all.iter().map(|c| c.record.alias.as_str()).collect();
    assert_eq!(order, ["animals", "animals02", "colors"]);
    assert_eq!(all[1].items.len(), 1);
}

#[tokio::test]
async fn test_text_filter_is_literal_and_matches_memory_store() {
    let (_tmp, config) = test_config();
    let sqlite = SqliteStore::open(&config).await.unwrap();
    let memory = InMemoryStore::new();
    let stores: [&dyn Store; 2] = [&sqlite, &memory];

    for store in stores {
        store
            .insert_box(&new_box("Cables"), "animals", "QRA")
            .await
            .unwrap();
        store
            .insert_box(&new_box("ÜBER 100% cotton"), "colors", "QRB")
            .await
            .unwrap();
    }

    let cases = [
        ("_", 0),
        ("%", 1),
        ("c_bles", 0),
        ("CABLES", 1),
        ("über", 1),
        ("100%", 1),
    ];
    for (text, expected) in cases {
        let filter = BoxFilter {
            text: Some(text.to_string()),
            ..Default::default()
        };
        for store in stores {
            let found = store.find_boxes(&filter).await.unwrap();
            assert_eq!(found.len(), expected, "text {:?}", text);
        }
    }
}

#[tokio::test]
async fn test_find_items_filters() {
    let (_tmp, config) = test_config();
    let store = SqliteStore::open(&config).await.unwrap();
    let a = store.insert_box(&new_box("a"), "animals", "QRA").await.unwrap();
    let b = store.insert_box(&new_box("b"), "colors", "QRB").await.unwrap();

    store
        .insert_item(
            &NewItem {
                box_id: a.id,
                location: Some("Attic".to_string()),
                description: Some("Wool scarf".to_string()),
                ..Default::default()
            },
            "cat",
        )
        .await
        .unwrap();
    store
        .insert_item(
            &NewItem {
                box_id: a.id,
                tags: Some("garden_tools".to_string()),
                ..Default::default()
            },
            "dog",
        )
        .await
        .unwrap();
    store
        .insert_item(
            &NewItem {
                box_id: b.id,
                location: Some("Attic".to_string()),
                ..Default::default()
            },
            "red",
        )
        .await
        .unwrap();

    let aliases = |items: Vec<witb_core::models::ItemRecord>| {
        items.into_iter().map(|i| i.alias).collect::<Vec<_>>()
    };

    let by_box = ItemFilter {
        box_id: Some(a.id),
        ..Default::default()
    };
    assert_eq!(aliases(store.find_items(&by_box).await.unwrap()), ["cat", "dog"]);

    let by_location = ItemFilter {
        location: Some("Attic".to_string()),
        ..Default::default()
    };
    assert_eq!(
        aliases(store.find_items(&by_location).await.unwrap()),
        ["cat", "red"]
    );

    let by_alias = ItemFilter {
        alias: Some("red".to_string()),
        ..Default::default()
    };
    assert_eq!(aliases(store.find_items(&by_alias).await.unwrap()), ["red"]);

    let by_text = ItemFilter {
        text: Some("SCARF".to_string()),
        ..Default::default()
    };
    assert_eq!(aliases(store.find_items(&by_text).await.unwrap()), ["cat"]);

    let underscore = ItemFilter {
        text: Some("w_ol".to_string()),
        ..Default::default()
    };
    assert!(store.find_items(&underscore).await.unwrap().is_empty());

    let combined = ItemFilter {
        box_id: Some(b.id),
        location: Some("Attic".to_string()),
        text: Some("scarf".to_string()),
        ..Default::default()
    };
    assert!(store.find_items(&combined).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_migrations_share_the_store_pool() {
    let (_tmp, config) = test_config();
    let pool = db::connect(&config).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();

    let store = SqliteStore::new(pool);
    store
        .insert_box(&new_box("a"), "animals", "QRA")
        .await
        .unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boxes")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
