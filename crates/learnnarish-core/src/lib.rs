//! Learn Narish content cache.
//!
//! A local-first mirror of the Learn Narish content server. Reads answer
//! from an on-disk store straight away and refresh from the server in the
//! background, so consumers always have something to show and see fresh
//! data as soon as it arrives.
//!
//! - `store`: durable per-collection partitions plus sync watermarks
//! - `sync`: incremental, paged pulls from a `RemoteSource`
//! - `cache`: dual `local`/`remote` reads and the memoised `CacheManager`
//! - `views`: page ordering, the word join and dictionary search
//! - `collation`: Narish alphabetical order
//! - `routes`: site path resolution over page links
//! - `api`: the HTTP client for the content server

pub mod api;
pub mod cache;
pub mod collation;
pub mod config;
pub mod models;
pub mod routes;
pub mod store;
pub mod sync;
pub mod utils;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use cache::{CacheError, CacheManager, DbResult, StoreLocation};
pub use config::Config;
pub use store::{Store, StoreError};
pub use sync::{RemoteSource, SyncEngine, SyncError};
