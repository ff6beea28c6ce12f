use std::path::PathBuf;

use thiserror::Error;

use crate::models::Collection;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Store schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Record in {collection} has no integer id")]
    MissingPrimaryKey { collection: Collection },

    #[error("Collection {collection} has no index named {index}")]
    UnknownIndex {
        collection: Collection,
        index: String,
    },

    #[error("Failed to decode {collection} record {id}: {source}")]
    Decode {
        collection: Collection,
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}
