use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use super::source::RemoteSource;
use super::{min_watermark, SyncError};
use crate::models::Collection;
use crate::store::Store;

/// Outcome of one successful sync pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub collection: Collection,
    /// Watermark the pass fetched from.
    pub since: DateTime<Utc>,
    /// Watermark written at the end of the pass.
    pub watermark: DateTime<Utc>,
    pub pages: u32,
    pub records: usize,
}

/// Incremental, per-collection synchronisation from a [`RemoteSource`]
/// into the [`Store`].
pub struct SyncEngine {
    store: Arc<Store>,
    source: Arc<dyn RemoteSource>,
    /// Serialises passes for the same collection; callers still each run
    /// their own pass.
    locks: Mutex<HashMap<Collection, Arc<AsyncMutex<()>>>>,
}

impl SyncEngine {
    pub fn new(store: Arc<Store>, source: Arc<dyn RemoteSource>) -> Self {
        Self {
            store,
            source,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    fn collection_lock(&self, collection: Collection) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(collection)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Fetch everything changed since the collection's watermark and commit
    /// it together with a new watermark.
    ///
    /// On failure nothing is written and the watermark stays where it was.
    pub async fn sync(&self, collection: Collection) -> Result<SyncReport, SyncError> {
        let lock = self.collection_lock(collection);
        let _guard = lock.lock().await;

        let result = self.pass(collection).await;
        match &result {
            Ok(report) => info!(
                collection = %collection,
                records = report.records,
                pages = report.pages,
                "Sync complete"
            ),
            Err(e) => warn!(collection = %collection, error = %e, "Sync failed"),
        }
        result
    }

    async fn pass(&self, collection: Collection) -> Result<SyncReport, SyncError> {
        let since = self
            .store
            .get_watermark(collection)
            .unwrap_or_else(min_watermark);
        debug!(collection = %collection, since = %since, "Starting sync pass");

        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let batch = self
                .source
                .fetch_page(collection, since, page)
                .await
                .map_err(|error| SyncError::RemoteFetch {
                    collection,
                    page,
                    error,
                })?;

            let received = batch.records.len();
            records.extend(batch.records);
            if records.len() as u64 >= batch.total {
                break;
            }
            if received == 0 {
                return Err(SyncError::Truncated {
                    collection,
                    received: records.len(),
                    expected: batch.total,
                });
            }
            page += 1;
        }

        // Local clock at commit time, not the newest record's timestamp.
        let watermark = Utc::now();
        let applied = self
            .store
            .commit(collection, records, watermark)
            .map_err(|source| SyncError::Store { collection, source })?;

        Ok(SyncReport {
            collection,
            since,
            watermark,
            pages: page,
            records: applied,
        })
    }

    /// Sync every collection in turn, collecting each result.
    pub async fn sync_all(&self) -> Vec<(Collection, Result<SyncReport, SyncError>)> {
        let mut results = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            results.push((collection, self.sync(collection).await));
        }
        results
    }
}
