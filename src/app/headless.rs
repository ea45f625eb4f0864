// CobbleLog - app/headless.rs
//
// Window-less export: fetch, filter, serialise, write. Used by `--export`.

use crate::app::cache::LogCache;
use crate::core::export::{self, CsvDocument, CsvStyle};
use crate::core::filter;
use crate::core::store::LogStore;
use crate::util::error::{MalformedRecord, Result};
use chrono::TimeZone;
use std::fmt::Display;
use std::path::Path;

/// Outcome of a headless export.
#[derive(Debug, Clone)]
pub struct HeadlessExport {
    /// The document written to disk, with the rows it had to skip.
    pub document: CsvDocument,

    /// Store response elements that were not records and never reached
    /// the cache.
    pub dropped: Vec<MalformedRecord>,
}

/// Fetch all records from `store`, keep those matching `term`, and write
/// them as CSV to `dest`.
///
/// Unlike the GUI, a failed fetch is returned to the caller so the process
/// can exit non-zero. Malformed records are skipped and listed in the result.
pub fn export_filtered<Tz>(
    store: &dyn LogStore,
    term: &str,
    style: CsvStyle,
    tz: &Tz,
    dest: &Path,
) -> Result<HeadlessExport>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut cache = LogCache::new();
    let dropped = cache.load(store)?;

    let indices = filter::filter_records(cache.records(), term);
    tracing::info!(
        total = cache.len(),
        matched = indices.len(),
        term,
        "Filtered logs for export"
    );

    let records = indices.iter().filter_map(|&idx| cache.records().get(idx));
    let document = export::render_csv(records, style, tz)?;
    export::save_document(&document, dest)?;
    Ok(HeadlessExport { document, dropped })
}
