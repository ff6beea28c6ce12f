use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::StoreError;
use crate::models::{Collection, IndexSpec};

/// Primary key of a raw record (`keyPath = "id"`).
pub fn primary_key(collection: Collection, record: &Value) -> Result<i64, StoreError> {
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(StoreError::MissingPrimaryKey { collection })
}

/// Integer key of `record` under `spec`; records without one are not indexed.
fn index_key(spec: &IndexSpec, record: &Value) -> Option<i64> {
    record.get(spec.key_path).and_then(Value::as_i64)
}

/// One collection's records plus its secondary indexes.
///
/// Index entries are `(key, id)` pairs so iteration order is key ascending
/// with ties broken by primary key.
#[derive(Debug, Clone)]
pub struct Partition {
    collection: Collection,
    records: BTreeMap<i64, Value>,
    indexes: BTreeMap<&'static str, BTreeSet<(i64, i64)>>,
}

impl Partition {
    pub fn new(collection: Collection) -> Self {
        let indexes = collection
            .indexes()
            .iter()
            .map(|spec| (spec.name, BTreeSet::new()))
            .collect();
        Self {
            collection,
            records: BTreeMap::new(),
            indexes,
        }
    }

    pub fn from_records(collection: Collection, records: BTreeMap<i64, Value>) -> Self {
        let mut partition = Self::new(collection);
        for (id, record) in records {
            partition.insert(id, record);
        }
        partition
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn records(&self) -> &BTreeMap<i64, Value> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Upsert by primary key, keeping every index in step.
    pub fn put(&mut self, record: Value) -> Result<i64, StoreError> {
        let id = primary_key(self.collection, &record)?;
        self.insert(id, record);
        Ok(id)
    }

    fn insert(&mut self, id: i64, record: Value) {
        let previous = self.records.insert(id, record);
        for spec in self.collection.indexes() {
            let Some(entries) = self.indexes.get_mut(spec.name) else {
                continue;
            };
            if let Some(key) = previous.as_ref().and_then(|old| index_key(spec, old)) {
                entries.remove(&(key, id));
            }
            if let Some(key) = self.records.get(&id).and_then(|new| index_key(spec, new)) {
                entries.insert((key, id));
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Value> {
        self.records.get(&id)
    }

    fn index(&self, name: &str) -> Result<&BTreeSet<(i64, i64)>, StoreError> {
        self.indexes
            .get(name)
            .ok_or_else(|| StoreError::UnknownIndex {
                collection: self.collection,
                index: name.to_string(),
            })
    }

    /// First record whose index key equals `key`.
    pub fn get_by_index(&self, name: &str, key: i64) -> Result<Option<&Value>, StoreError> {
        let index = self.index(name)?;
        Ok(index
            .range((key, i64::MIN)..=(key, i64::MAX))
            .next()
            .and_then(|(_, id)| self.records.get(id)))
    }

    /// All records, in primary key order or in index order.
    pub fn get_all(&self, index: Option<&str>) -> Result<Vec<&Value>, StoreError> {
        match index {
            None => Ok(self.records.values().collect()),
            Some(name) => {
                let index = self.index(name)?;
                Ok(index
                    .iter()
                    .filter_map(|(_, id)| self.records.get(id))
                    .collect())
            }
        }
    }
}
