use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use learnnarish_core::cache::{CacheError, CacheManager, StoreLocation};
use learnnarish_core::models::Collection;
use learnnarish_core::store::{StoreError, SCHEMA_VERSION, STORE_FILE};
use learnnarish_core::sync::{RemotePage, RemoteSource, SyncError};

/// Serves each collection's records in one page, or fails every fetch.
struct StaticSource {
    records: HashMap<Collection, Vec<Value>>,
    offline: bool,
}

impl StaticSource {
    fn online(records: HashMap<Collection, Vec<Value>>) -> Self {
        Self {
            records,
            offline: false,
        }
    }

    fn offline() -> Self {
        Self {
            records: HashMap::new(),
            offline: true,
        }
    }
}

#[async_trait]
impl RemoteSource for StaticSource {
    async fn fetch_page(
        &self,
        collection: Collection,
        _since: DateTime<Utc>,
        _page: u32,
    ) -> anyhow::Result<RemotePage> {
        if self.offline {
            anyhow::bail!("network unreachable");
        }
        let records = self.records.get(&collection).cloned().unwrap_or_default();
        Ok(RemotePage {
            total: records.len() as u64,
            records,
        })
    }
}

fn content() -> HashMap<Collection, Vec<Value>> {
    HashMap::from([
        (
            Collection::Words,
            vec![json!({"id": 1, "word": "kat", "root": 10, "definitions": [100]})],
        ),
        (
            Collection::Roots,
            vec![json!({"id": 10, "bone_one": "k", "bone_two": "t"})],
        ),
        (
            Collection::Definitions,
            vec![json!({"id": 100, "definition": "stone", "examples": [1000]})],
        ),
        (
            Collection::Examples,
            vec![json!({"id": 1000, "narish": "kat", "english": "stone"})],
        ),
        (
            Collection::Lessons,
            vec![
                json!({"id": 1, "number": 2, "title": "Patterns"}),
                json!({"id": 2, "number": 1, "title": "Roots"}),
                json!({"id": 3, "title": "Draft"}),
            ],
        ),
    ])
}

#[tokio::test]
async fn test_synced_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(STORE_FILE);

    let online = CacheManager::new(
        StoreLocation::File(path.clone()),
        Arc::new(StaticSource::online(content())),
    );
    for (collection, result) in online.sync_all().await.unwrap() {
        assert!(result.is_ok(), "{collection} failed to sync");
    }
    let synced_at = online.status().await.unwrap();
    drop(online);
    assert!(path.exists());

    // Offline: local data comes from disk, remote halves reject.
    let offline = CacheManager::new(
        StoreLocation::File(path.clone()),
        Arc::new(StaticSource::offline()),
    );
    assert_eq!(offline.status().await.unwrap(), synced_at);

    let words = offline.word_data().await.unwrap();
    assert_eq!(words.local.len(), 1);
    assert_eq!(words.local[0].definitions[0].examples[0].english, "stone");

    let err = words.resolve().await.unwrap_err();
    assert!(matches!(
        err.sync_error(),
        Some(SyncError::RemoteFetch { .. })
    ));
    assert_eq!(words.latest().await.len(), 1);

    let lessons = offline.lessons().await.unwrap();
    let numbers: Vec<Option<i64>> = lessons.local.iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2)]);

    // A failed sync leaves the watermarks where they were.
    assert_eq!(offline.status().await.unwrap(), synced_at);
}

#[tokio::test]
async fn test_newer_store_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STORE_FILE);
    std::fs::write(
        &path,
        json!({
            "version": SCHEMA_VERSION + 1,
            "partitions": {},
            "lastUpdated": {},
        })
        .to_string(),
    )
    .unwrap();

    let manager = CacheManager::new(
        StoreLocation::File(path),
        Arc::new(StaticSource::offline()),
    );
    assert!(matches!(
        manager.open().await,
        Err(CacheError::SchemaOpen(StoreError::UnsupportedVersion { .. }))
    ));
}

#[tokio::test]
async fn test_corrupt_store_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STORE_FILE);
    std::fs::write(&path, "{ not json").unwrap();

    let manager = CacheManager::new(
        StoreLocation::File(path),
        Arc::new(StaticSource::offline()),
    );
    assert!(matches!(
        manager.pages().await,
        Err(CacheError::SchemaOpen(StoreError::Corrupt { .. }))
    ));
}
