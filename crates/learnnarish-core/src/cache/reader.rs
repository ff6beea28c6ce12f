use std::sync::Arc;

use futures::future::FutureExt;
use tokio::runtime::Handle;
use tracing::debug;

use super::result::{DbResult, Remote};
use super::CacheError;
use crate::models::{Collection, Record};
use crate::store::{Store, StoreError};
use crate::sync::SyncEngine;

/// How to find a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKey {
    /// By primary key.
    Primary(i64),
    /// First record whose `index` key equals `key`.
    Index { index: &'static str, key: i64 },
}

/// Reads that answer from the store immediately and refresh in the
/// background.
///
/// Every read spawns its own sync pass for the collection on the current
/// Tokio runtime. The pass runs to completion whether or not anyone awaits
/// the remote half.
#[derive(Clone)]
pub struct Reader {
    engine: Arc<SyncEngine>,
}

impl Reader {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn store(&self) -> &Arc<Store> {
        self.engine.store()
    }

    pub fn read<T: Record>(&self, key: ReadKey) -> Result<DbResult<Option<T>>, CacheError> {
        let local = lookup::<T>(self.store(), key)?;
        let remote = self.spawn_sync(T::COLLECTION, move |store| lookup::<T>(store, key))?;
        Ok(DbResult { local, remote })
    }

    pub fn read_all<T: Record>(
        &self,
        index: Option<&'static str>,
    ) -> Result<DbResult<Arc<Vec<T>>>, CacheError> {
        let local = Arc::new(self.store().get_all_records::<T>(index)?);
        debug!(collection = %T::COLLECTION, count = local.len(), "Local read");
        let remote = self.spawn_sync(T::COLLECTION, move |store| {
            store.get_all_records::<T>(index).map(Arc::new)
        })?;
        Ok(DbResult { local, remote })
    }

    /// Start a sync pass for `collection`, then re-read with `reread`.
    fn spawn_sync<R, F>(&self, collection: Collection, reread: F) -> Result<Remote<R>, CacheError>
    where
        R: Clone + Send + Sync + 'static,
        F: FnOnce(&Store) -> Result<R, StoreError> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let engine = Arc::clone(&self.engine);
        let task = runtime.spawn(async move {
            engine.sync(collection).await?;
            Ok::<R, CacheError>(reread(engine.store().as_ref())?)
        });

        Ok(async move {
            match task.await {
                Ok(result) => result.map_err(Arc::new),
                Err(e) => Err(Arc::new(CacheError::Task(e.to_string()))),
            }
        }
        .boxed()
        .shared())
    }
}

fn lookup<T: Record>(store: &Store, key: ReadKey) -> Result<Option<T>, StoreError> {
    match key {
        ReadKey::Primary(id) => store.get_record::<T>(id),
        ReadKey::Index { index, key } => store.get_record_by_index::<T>(index, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lesson, Word, BY_NUMBER};
    use crate::sync::{RemotePage, RemoteSource};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};
    use tokio::sync::Notify;

    /// Holds every fetch until released, then serves `records`.
    struct GatedSource {
        records: Vec<Value>,
        gate: Notify,
        fail: bool,
    }

    #[async_trait]
    impl RemoteSource for GatedSource {
        async fn fetch_page(
            &self,
            _collection: Collection,
            _since: DateTime<Utc>,
            _page: u32,
        ) -> anyhow::Result<RemotePage> {
            self.gate.notified().await;
            if self.fail {
                anyhow::bail!("offline");
            }
            Ok(RemotePage {
                records: self.records.clone(),
                total: self.records.len() as u64,
            })
        }
    }

    fn reader(source: Arc<GatedSource>) -> Reader {
        let store = Arc::new(Store::in_memory());
        Reader::new(Arc::new(SyncEngine::new(store, source)))
    }

    #[tokio::test]
    async fn test_local_is_available_before_sync() {
        let source = Arc::new(GatedSource {
            records: vec![json!({"id": 2, "word": "sal"})],
            gate: Notify::new(),
            fail: false,
        });
        let reader = reader(source.clone());
        reader
            .store()
            .put(Collection::Words, json!({"id": 1, "word": "kat"}))
            .unwrap();

        let result = reader.read_all::<Word>(None).unwrap();
        assert_eq!(result.local.len(), 1);

        source.gate.notify_one();
        let remote = result.resolve().await.unwrap();
        assert_eq!(remote.len(), 2);
        assert_eq!(result.local.len(), 1);
    }

    #[tokio::test]
    async fn test_sync_failure_rejects_remote_only() {
        let source = Arc::new(GatedSource {
            records: vec![],
            gate: Notify::new(),
            fail: true,
        });
        let reader = reader(source.clone());
        reader
            .store()
            .put(Collection::Lessons, json!({"id": 1, "number": 4}))
            .unwrap();

        let result = reader
            .read::<Lesson>(ReadKey::Index { index: BY_NUMBER, key: 4 })
            .unwrap();
        assert_eq!(result.local.as_ref().map(|l| l.id), Some(1));

        source.gate.notify_one();
        let err = result.resolve().await.unwrap_err();
        assert!(matches!(err.sync_error(), Some(crate::sync::SyncError::RemoteFetch { .. })));
    }

    #[tokio::test]
    async fn test_sync_runs_without_awaiting_remote() {
        let source = Arc::new(GatedSource {
            records: vec![json!({"id": 9, "word": "tam"})],
            gate: Notify::new(),
            fail: false,
        });
        let reader = reader(source.clone());

        let result = reader.read::<Word>(ReadKey::Primary(9)).unwrap();
        assert!(result.local.is_none());
        drop(result);

        source.gate.notify_one();
        for _ in 0..50 {
            if reader.store().get_watermark(Collection::Words).is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(reader.store().get(Collection::Words, 9).is_some());
    }

    #[test]
    fn test_read_outside_runtime_fails() {
        let source = Arc::new(GatedSource {
            records: vec![],
            gate: Notify::new(),
            fail: false,
        });
        let reader = reader(source);
        assert!(matches!(
            reader.read_all::<Word>(None),
            Err(CacheError::NoRuntime)
        ));
    }
}
