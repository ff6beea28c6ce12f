use std::sync::Arc;

use thiserror::Error;

use crate::store::StoreError;
use crate::sync::SyncError;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The store could not be created or opened. Nothing works without it.
    #[error("Failed to open local store: {0}")]
    SchemaOpen(#[source] StoreError),

    #[error("Local store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sync failed: {0}")]
    Sync(#[source] Arc<SyncError>),

    #[error("Background sync task failed: {0}")]
    Task(String),

    #[error("Cache reads must run inside a Tokio runtime")]
    NoRuntime,
}

impl From<SyncError> for CacheError {
    fn from(e: SyncError) -> Self {
        CacheError::Sync(Arc::new(e))
    }
}

impl CacheError {
    /// The sync failure behind this error, if any.
    pub fn sync_error(&self) -> Option<&SyncError> {
        match self {
            CacheError::Sync(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
