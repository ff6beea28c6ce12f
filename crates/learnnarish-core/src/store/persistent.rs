use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::partition::Partition;
use super::StoreError;
use crate::models::{Collection, Record};

/// Version of the on-disk layout written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// File name of the store inside the cache directory.
pub const STORE_FILE: &str = "learnnarish.json";

#[derive(Debug, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    partitions: BTreeMap<String, BTreeMap<i64, Value>>,
    #[serde(default, rename = "lastUpdated")]
    last_updated: BTreeMap<String, DateTime<Utc>>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    partitions: BTreeMap<&'static str, &'a BTreeMap<i64, Value>>,
    #[serde(rename = "lastUpdated")]
    last_updated: &'a BTreeMap<String, DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct StoreState {
    partitions: HashMap<Collection, Partition>,
    /// The `lastUpdated` partition: collection name to sync watermark.
    watermarks: BTreeMap<String, DateTime<Utc>>,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            partitions: Collection::ALL
                .into_iter()
                .map(|c| (c, Partition::new(c)))
                .collect(),
            watermarks: BTreeMap::new(),
        }
    }

    fn partition(&self, collection: Collection) -> Option<&Partition> {
        self.partitions.get(&collection)
    }
}

/// Durable keyed store with one partition per collection plus the
/// `lastUpdated` watermark partition.
///
/// Reads are served from memory. Every write rewrites the store file
/// (temp file then rename) before the new state becomes visible, so a
/// failed write leaves both the file and the in-memory view untouched.
/// Readers only wait for the in-memory swap, never for the disk.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
    /// Held for the whole of a write, so the state a write was built from
    /// is still current when it is published.
    writer: Mutex<()>,
}

impl Store {
    /// Open the store at `path`, creating the file and any missing
    /// partitions on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let (state, needs_write) = if path.exists() {
            Self::load(&path)?
        } else {
            info!(path = %path.display(), version = SCHEMA_VERSION, "Creating store");
            (StoreState::empty(), true)
        };

        let store = Self {
            path: Some(path),
            state: RwLock::new(state),
            writer: Mutex::new(()),
        };
        if needs_write {
            let state = store.read_state();
            store.persist(&state, None, &state.watermarks)?;
        }
        Ok(store)
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreState::empty()),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load(path: &Path) -> Result<(StoreState, bool), StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: StoreFile =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        if file.version > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: file.version,
                supported: SCHEMA_VERSION,
            });
        }

        let mut state = StoreState::empty();
        let mut needs_write = false;
        let mut partitions = file.partitions;
        for collection in Collection::ALL {
            match partitions.remove(collection.as_str()) {
                Some(records) => {
                    state
                        .partitions
                        .insert(collection, Partition::from_records(collection, records));
                }
                None => needs_write = true,
            }
        }
        for name in partitions.keys() {
            warn!(partition = %name, "Ignoring unknown partition in store file");
        }
        state.watermarks = file.last_updated;

        debug!(path = %path.display(), "Store loaded");
        Ok((state, needs_write))
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `state` to disk with `replacement` standing in for its
    /// partition of the same collection.
    fn persist(
        &self,
        state: &StoreState,
        replacement: Option<&Partition>,
        watermarks: &BTreeMap<String, DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut partitions: BTreeMap<&'static str, &BTreeMap<i64, Value>> = state
            .partitions
            .iter()
            .map(|(c, p)| (c.as_str(), p.records()))
            .collect();
        if let Some(partition) = replacement {
            partitions.insert(partition.collection().as_str(), partition.records());
        }
        let snapshot = StoreFileRef {
            version: SCHEMA_VERSION,
            partitions,
            last_updated: watermarks,
        };
        let contents = serde_json::to_vec(&snapshot).map_err(StoreError::Serialize)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })
    }

    /// Apply `f` to a copy of one partition and the watermarks, persist the
    /// result, and only then publish it.
    fn transact<R>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut Partition, &mut BTreeMap<String, DateTime<Utc>>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let (partition, watermarks, result) = {
            let state = self.read_state();
            let mut partition = state
                .partitions
                .get(&collection)
                .cloned()
                .unwrap_or_else(|| Partition::new(collection));
            let mut watermarks = state.watermarks.clone();
            let result = f(&mut partition, &mut watermarks)?;
            self.persist(&state, Some(&partition), &watermarks)?;
            (partition, watermarks, result)
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.partitions.insert(collection, partition);
        state.watermarks = watermarks;
        Ok(result)
    }

    // ===== Reads =====

    pub fn get(&self, collection: Collection, id: i64) -> Option<Value> {
        self.read_state()
            .partition(collection)
            .and_then(|p| p.get(id))
            .cloned()
    }

    pub fn get_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: i64,
    ) -> Result<Option<Value>, StoreError> {
        let state = self.read_state();
        match state.partition(collection) {
            Some(p) => Ok(p.get_by_index(index, key)?.cloned()),
            None => Ok(None),
        }
    }

    /// All records of a collection. With an index, ordered by index key
    /// ascending and limited to records that have that key.
    pub fn get_all(
        &self,
        collection: Collection,
        index: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let state = self.read_state();
        match state.partition(collection) {
            Some(p) => Ok(p.get_all(index)?.into_iter().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.read_state()
            .partition(collection)
            .map(Partition::len)
            .unwrap_or(0)
    }

    pub fn get_record<T: Record>(&self, id: i64) -> Result<Option<T>, StoreError> {
        self.get(T::COLLECTION, id).map(|v| decode(id, v)).transpose()
    }

    pub fn get_record_by_index<T: Record>(
        &self,
        index: &str,
        key: i64,
    ) -> Result<Option<T>, StoreError> {
        match self.get_by_index(T::COLLECTION, index, key)? {
            Some(value) => {
                let id = value.get("id").and_then(Value::as_i64).unwrap_or_default();
                decode(id, value).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Typed listing. Records that no longer match the model are skipped
    /// with a warning rather than failing the whole read.
    pub fn get_all_records<T: Record>(&self, index: Option<&str>) -> Result<Vec<T>, StoreError> {
        let values = self.get_all(T::COLLECTION, index)?;
        Ok(values
            .into_iter()
            .filter_map(|value| {
                let id = value.get("id").and_then(Value::as_i64).unwrap_or_default();
                match decode::<T>(id, value) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(collection = %T::COLLECTION, id, error = %e, "Skipping undecodable record");
                        None
                    }
                }
            })
            .collect())
    }

    pub fn get_watermark(&self, collection: Collection) -> Option<DateTime<Utc>> {
        self.read_state().watermarks.get(collection.as_str()).copied()
    }

    // ===== Writes =====

    /// Upsert one record by primary key.
    pub fn put(&self, collection: Collection, record: Value) -> Result<i64, StoreError> {
        self.transact(collection, |partition, _| partition.put(record))
    }

    pub fn set_watermark(
        &self,
        collection: Collection,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.transact(collection, |_, watermarks| {
            watermarks.insert(collection.as_str().to_string(), at);
            Ok(())
        })
    }

    /// Upsert a sync pass's records and advance the watermark as one unit.
    /// If any record is rejected nothing is written.
    pub fn commit(
        &self,
        collection: Collection,
        records: Vec<Value>,
        watermark: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        self.transact(collection, |partition, watermarks| {
            let count = records.len();
            for record in records {
                partition.put(record)?;
            }
            watermarks.insert(collection.as_str().to_string(), watermark);
            Ok(count)
        })
    }
}

fn decode<T: Record>(id: i64, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::Decode {
        collection: T::COLLECTION,
        id,
        source,
    })
}
