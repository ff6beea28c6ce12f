//! Incremental synchronisation from the content server.
//!
//! Each collection carries a watermark. A pass pages through everything
//! created or updated after it, then writes the records and a new
//! watermark in one store commit. A failed pass writes nothing.

pub mod engine;
pub mod error;
pub mod source;

use chrono::{DateTime, Utc};

pub use engine::{SyncEngine, SyncReport};
pub use error::SyncError;
pub use source::{RemotePage, RemoteSource};

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z.
const YEAR_ONE_TIMESTAMP: i64 = -62_135_596_800;

/// Watermark used for a collection that has never been synced.
pub fn min_watermark() -> DateTime<Utc> {
    DateTime::from_timestamp(YEAR_ONE_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
