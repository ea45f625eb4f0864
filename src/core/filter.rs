// CobbleLog - core/filter.rs
//
// Free-text search over log records.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{is_truthy, value_text, LogRecord};

/// Apply a search term to a slice of records, returning indices of matches.
///
/// A record matches when any top-level field value, in its text form,
/// contains the term (both sides compared case-insensitively). Falsy values
/// (`null`, `false`, `0`, `""`) never match. An empty term matches every
/// record.
///
/// Returns indices into `records` in cache order, so nothing is copied and
/// the display order stays equal to the cache order.
pub fn filter_records(records: &[LogRecord], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..records.len()).collect();
    }

    let term_lower = term.to_lowercase();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_term(record, &term_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check a single record against an already lower-cased, non-empty term.
fn matches_term(record: &LogRecord, term_lower: &str) -> bool {
    record
        .values()
        .filter(|value| is_truthy(value))
        .any(|value| value_text(value).to_lowercase().contains(term_lower))
}
