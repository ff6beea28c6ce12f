use thiserror::Error;

use crate::api::ApiError;
use crate::models::Collection;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch page {page} of {collection}: {error:#}")]
    RemoteFetch {
        collection: Collection,
        page: u32,
        error: anyhow::Error,
    },

    #[error("{collection} sync ended early: received {received} of {expected} records")]
    Truncated {
        collection: Collection,
        received: usize,
        expected: u64,
    },

    #[error("Failed to write {collection} sync results: {source}")]
    Store {
        collection: Collection,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    pub fn collection(&self) -> Collection {
        match self {
            SyncError::RemoteFetch { collection, .. }
            | SyncError::Truncated { collection, .. }
            | SyncError::Store { collection, .. } => *collection,
        }
    }

    /// The HTTP-level cause, when the remote source is the API client.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            SyncError::RemoteFetch { error, .. } => error.downcast_ref::<ApiError>(),
            _ => None,
        }
    }
}
