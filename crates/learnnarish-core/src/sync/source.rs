use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::models::Collection;

/// One page of records changed since a watermark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePage {
    pub records: Vec<Value>,
    /// Number of records matching the filter across all pages.
    pub total: u64,
}

/// The source of record the cache is synchronised from.
///
/// Page numbers start at 1. Implementations must return every record whose
/// `date_updated` or `date_created` is later than `since`.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_page(
        &self,
        collection: Collection,
        since: DateTime<Utc>,
        page: u32,
    ) -> anyhow::Result<RemotePage>;
}

/// The "changed since" filter: created or updated after `since`.
pub fn changed_since_filter(since: DateTime<Utc>) -> Value {
    let since = since.to_rfc3339_opts(SecondsFormat::Millis, true);
    json!({
        "_or": [
            { "date_updated": { "_gt": since } },
            { "date_created": { "_gt": since } },
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::min_watermark;

    #[test]
    fn test_changed_since_filter_from_minimum() {
        let filter = changed_since_filter(min_watermark());
        assert_eq!(
            filter,
            json!({"_or": [
                {"date_updated": {"_gt": "0001-01-01T00:00:00.000Z"}},
                {"date_created": {"_gt": "0001-01-01T00:00:00.000Z"}}
            ]})
        );
    }
}
