//! Local-first reads over the store.
//!
//! A read answers immediately from the store (`local`) and, in the
//! background, syncs the collection and answers again (`remote`). The
//! `CacheManager` builds the application's views on top of those reads and
//! memoises them.

pub mod error;
pub mod manager;
pub mod reader;
pub mod result;

pub use error::CacheError;
pub use manager::{CacheManager, CacheStatus, CollectionStatus, StoreLocation};
pub use reader::{ReadKey, Reader};
pub use result::{DbResult, Remote, RemoteResult};
