use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::warn;

use super::CacheError;

/// Outcome of the background half of a [`DbResult`].
pub type RemoteResult<T> = Result<T, Arc<CacheError>>;

/// A cloneable handle on the value a read will have once its sync settles.
pub type Remote<T> = Shared<BoxFuture<'static, RemoteResult<T>>>;

/// A value available now, paired with the value it will have after the
/// freshest sync.
///
/// Consumers render `local` straight away and swap to `remote` when it
/// resolves. A failed sync rejects `remote`; `local` is unaffected.
pub struct DbResult<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub local: T,
    pub remote: Remote<T>,
}

impl<T> Clone for DbResult<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            local: self.local.clone(),
            remote: self.remote.clone(),
        }
    }
}

impl<T> fmt::Debug for DbResult<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbResult")
            .field("local", &self.local)
            .field("remote_settled", &self.remote.peek().is_some())
            .finish()
    }
}

impl<T> DbResult<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(local: T, remote: F) -> Self
    where
        F: Future<Output = RemoteResult<T>> + Send + 'static,
    {
        Self {
            local,
            remote: remote.boxed().shared(),
        }
    }

    /// A result whose remote half is the local value.
    pub fn ready(value: T) -> Self {
        let remote = value.clone();
        Self::new(value, async move { Ok(remote) })
    }

    /// Apply a projection to both halves.
    pub fn map<U, F>(&self, f: F) -> DbResult<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let local = f(&self.local);
        let remote = self.remote.clone();
        DbResult::new(local, async move { remote.await.map(|value| f(&value)) })
    }

    /// Pair two results. The remote half settles once both inputs' remote
    /// halves have, and fails if either does.
    pub fn zip<U>(&self, other: &DbResult<U>) -> DbResult<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let local = (self.local.clone(), other.local.clone());
        let left = self.remote.clone();
        let right = other.remote.clone();
        DbResult::new(local, async move { futures::try_join!(left, right) })
    }

    /// Wait for the synced value.
    pub async fn resolve(&self) -> RemoteResult<T> {
        self.remote.clone().await
    }

    /// The synced value, or the local one if the sync failed.
    pub async fn latest(&self) -> T {
        match self.resolve().await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Sync failed, keeping local data");
                self.local.clone()
            }
        }
    }
}
