// CobbleLog - core/store.rs
//
// Interface to the remote log store. The core only depends on this trait;
// the HTTP implementation lives in the platform layer.

use crate::core::model::LogRecord;
use crate::util::error::{MalformedRecord, StoreError};

/// Records returned by a successful fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchedRecords {
    /// Usable records, in the order the store returned them.
    pub records: Vec<LogRecord>,

    /// Array elements that were not records and were dropped.
    pub malformed: Vec<MalformedRecord>,
}

/// The log store collaborator.
///
/// Implementations must be callable from worker threads.
pub trait LogStore: Send + Sync {
    /// Fetch the full record set (`GET /log`).
    fn fetch_all(&self) -> Result<FetchedRecords, StoreError>;

    /// Delete one record (`DELETE /log/{id}`). Any success status is `Ok`.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Split a decoded JSON array into records and malformed elements.
pub fn collect_records(items: Vec<serde_json::Value>) -> FetchedRecords {
    let mut fetched = FetchedRecords::default();
    for (position, item) in items.into_iter().enumerate() {
        match LogRecord::from_value(item) {
            Some(record) => fetched.records.push(record),
            None => {
                let malformed = MalformedRecord {
                    position,
                    id: None,
                    field: "<record>",
                };
                tracing::warn!(error = %malformed, "Dropping non-object element from store response");
                fetched.malformed.push(malformed);
            }
        }
    }
    fetched
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_records_keeps_order_and_drops_non_objects() {
        let fetched = collect_records(vec![
            json!({"_id": "a"}),
            json!(null),
            json!({"_id": "b"}),
            json!("stray"),
        ]);
        let ids: Vec<_> = fetched.records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let positions: Vec<_> = fetched.malformed.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 3]);
    }
}
