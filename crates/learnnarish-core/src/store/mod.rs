//! Persistent local store.
//!
//! One partition per collection, keyed by record id, plus the `lastUpdated`
//! partition holding each collection's sync watermark. The whole store is
//! a single JSON file (schema version 1) so that a sync pass's records and
//! its watermark are written together or not at all.

pub mod error;
pub mod partition;
pub mod persistent;

pub use error::StoreError;
pub use persistent::{Store, SCHEMA_VERSION, STORE_FILE};
