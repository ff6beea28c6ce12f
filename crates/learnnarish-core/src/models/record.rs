use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Index over the `number` field of lessons and patterns.
pub const BY_NUMBER: &str = "by-number";

/// Index over the `display_order` field of pages.
pub const BY_DISPLAY_ORDER: &str = "by-display_order";

/// A secondary index: a name and the integer field it is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub key_path: &'static str,
}

const NUMBER_INDEXES: &[IndexSpec] = &[IndexSpec {
    name: BY_NUMBER,
    key_path: "number",
}];

const PAGE_INDEXES: &[IndexSpec] = &[IndexSpec {
    name: BY_DISPLAY_ORDER,
    key_path: "display_order",
}];

/// The remote collections mirrored by the cache, one store partition each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Lessons,
    Patterns,
    Pages,
    Words,
    Roots,
    Examples,
    Definitions,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Lessons,
        Collection::Patterns,
        Collection::Pages,
        Collection::Words,
        Collection::Roots,
        Collection::Examples,
        Collection::Definitions,
    ];

    /// Name used both for the remote collection and the store partition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Lessons => "lessons",
            Collection::Patterns => "patterns",
            Collection::Pages => "pages",
            Collection::Words => "words",
            Collection::Roots => "roots",
            Collection::Examples => "examples",
            Collection::Definitions => "definitions",
        }
    }

    pub fn from_name(name: &str) -> Option<Collection> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn indexes(&self) -> &'static [IndexSpec] {
        match self {
            Collection::Lessons | Collection::Patterns => NUMBER_INDEXES,
            Collection::Pages => PAGE_INDEXES,
            _ => &[],
        }
    }

    pub fn index(&self, name: &str) -> Option<&'static IndexSpec> {
        self.indexes().iter().find(|spec| spec.name == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping fields every remote record carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecordMeta {
    #[serde(default)]
    pub user_created: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub user_updated: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
}

/// A typed record stored in one of the cache partitions.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> i64;
}
