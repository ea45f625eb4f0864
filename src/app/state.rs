// CobbleLog - app/state.rs
//
// Application state for one log table view: the record cache, the search
// term, the derived projection, and the pending user actions.
// Owned by the eframe::App implementation and dropped with it.
//
// The projection (`filtered_indices` and the display-ready `table_rows`) is
// recomputed explicitly whenever the cache or the search term changes;
// nothing else mutates it.

use crate::app::cache::LogCache;
use crate::app::navigation::{edit_path, Navigator, Router};
use crate::app::store_worker::StoreProgress;
use crate::core::export::{self, project_row, CsvDocument, CsvStyle};
use crate::core::filter;
use crate::core::model::LogRecord;
use crate::platform::config::AppConfig;
use crate::util::constants;
use crate::util::error::{ExportError, MalformedRecord};
use chrono::TimeZone;
use std::collections::HashSet;
use std::fmt::Display;

/// One table row, projected once per filter pass rather than once per frame.
#[derive(Debug, Clone)]
pub struct TableRow {
    /// Record id, when the record carries one (drives Edit/Delete).
    pub id: Option<String>,

    /// Display cells in `CSV_HEADERS` order, in the local time zone.
    pub cells: Result<[String; 10], MalformedRecord>,
}

/// Top-level view state.
#[derive(Debug)]
pub struct AppState {
    /// Records as last fetched, minus confirmed deletes.
    pub cache: LogCache,

    /// Current contents of the search box.
    pub search_term: String,

    /// Indices into `cache.records()` matching `search_term`.
    pub filtered_indices: Vec<usize>,

    /// `filtered_indices` projected for display, same order and length.
    pub table_rows: Vec<TableRow>,

    /// Current view and back stack.
    pub router: Router,

    /// Whether the initial fetch is still outstanding.
    pub loading: bool,

    /// Record awaiting the user's delete confirmation.
    pub pending_delete: Option<String>,

    /// Confirmed deletes not yet handed to the store worker.
    delete_requests: Vec<String>,

    /// Deletes sent to the store and not yet answered.
    pub deletes_in_flight: HashSet<String>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config, malformed records, failed requests).
    pub warnings: Vec<String>,

    /// Base URL of the log store, for display.
    pub server_url: String,

    /// File name offered by the save dialog.
    pub export_file_name: String,

    pub csv_style: CsvStyle,

    pub dark_mode: bool,

    pub font_size: f32,

    pub show_about: bool,

    pub show_warnings: bool,

    /// Set by the "Save data" button; consumed by the app loop.
    pub request_export: bool,
}

impl AppState {
    /// Create the initial (empty, loading) state from validated config.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            cache: LogCache::new(),
            search_term: String::new(),
            filtered_indices: Vec::new(),
            table_rows: Vec::new(),
            router: Router::default(),
            loading: true,
            pending_delete: None,
            delete_requests: Vec::new(),
            deletes_in_flight: HashSet::new(),
            status_message: "Loading logs...".to_string(),
            warnings: Vec::new(),
            server_url: config.server_url.clone(),
            export_file_name: config.export_file_name.clone(),
            csv_style: if config.quote_fields {
                CsvStyle::Quoted
            } else {
                CsvStyle::Raw
            },
            dark_mode: config.dark_mode,
            font_size: config.font_size,
            show_about: false,
            show_warnings: false,
            request_export: false,
        }
    }

    /// Recompute `filtered_indices` and `table_rows` from the cache and
    /// search term.
    pub fn apply_filters(&mut self) {
        self.filtered_indices = filter::filter_records(self.cache.records(), &self.search_term);

        let tz = chrono::Local;
        let rows: Vec<TableRow> = self
            .filtered_records()
            .enumerate()
            .map(|(position, record)| TableRow {
                id: record.id(),
                cells: project_row(record, position, &tz),
            })
            .collect();
        self.table_rows = rows;
    }

    /// Replace the search term and recompute the projection.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.apply_filters();
    }

    /// Records in the current projection, in display order.
    pub fn filtered_records(&self) -> impl Iterator<Item = &LogRecord> + '_ {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.cache.records().get(idx))
    }

    /// Record a non-fatal warning, dropping the oldest beyond the cap.
    pub fn push_warning(&mut self, message: String) {
        if self.warnings.len() >= constants::MAX_WARNINGS {
            self.warnings.remove(0);
        }
        self.warnings.push(message);
    }

    /// Apply one message from the store worker.
    pub fn apply_progress(&mut self, message: StoreProgress) {
        match message {
            StoreProgress::Loaded { records, malformed } => {
                self.loading = false;
                self.cache.replace(records);
                for m in malformed {
                    self.push_warning(format!("Ignored store element: {m}"));
                }
                self.status_message = format!("Loaded {} logs.", self.cache.len());
                self.apply_filters();
            }
            StoreProgress::LoadFailed { error } => {
                self.loading = false;
                self.status_message = "Could not load logs. See warnings.".to_string();
                self.push_warning(error);
            }
            StoreProgress::Deleted { id } => {
                self.deletes_in_flight.remove(&id);
                if self.cache.remove_local(&id) {
                    self.status_message = format!("Deleted log {id}.");
                }
                self.apply_filters();
            }
            StoreProgress::DeleteFailed { id, error } => {
                self.deletes_in_flight.remove(&id);
                self.status_message = format!("Could not delete log {id}.");
                self.push_warning(error);
            }
        }
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: String) {
        self.pending_delete = Some(id);
    }

    /// The user confirmed the pending delete: queue it for the store.
    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            if self.deletes_in_flight.insert(id.clone()) {
                self.delete_requests.push(id);
            }
        }
    }

    /// The user dismissed the confirmation.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Drain confirmed deletes for dispatch.
    pub fn take_delete_requests(&mut self) -> Vec<String> {
        std::mem::take(&mut self.delete_requests)
    }

    /// Navigate to the edit view for `id`. No local state changes.
    pub fn request_edit(&mut self, id: &str) {
        self.router.go_to(&edit_path(id));
    }

    /// Serialise the current projection using the local time zone.
    pub fn csv_document(&self) -> Result<CsvDocument, ExportError> {
        self.csv_document_in(&chrono::Local)
    }

    /// Serialise the current projection, rendering timestamps in `tz`.
    pub fn csv_document_in<Tz>(&self, tz: &Tz) -> Result<CsvDocument, ExportError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        export::render_csv(self.filtered_records(), self.csv_style, tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cache::tests::record;
    use crate::app::navigation::Route;
    use chrono::Utc;
    use serde_json::json;

    fn loaded_state(values: Vec<serde_json::Value>) -> AppState {
        let mut state = AppState::new(&AppConfig::default());
        state.apply_progress(StoreProgress::Loaded {
            records: values.into_iter().map(record).collect(),
            malformed: Vec::new(),
        });
        state
    }

    fn visible_ids(state: &AppState) -> Vec<String> {
        state.filtered_records().filter_map(|r| r.id()).collect()
    }

    #[test]
    fn test_initial_state_is_empty_and_loading() {
        let state = AppState::new(&AppConfig::default());
        assert!(state.loading);
        assert!(state.cache.is_empty());
        assert_eq!(state.export_file_name, "log_data.csv");
        assert_eq!(state.csv_style, CsvStyle::Raw);
    }

    #[test]
    fn test_load_shows_everything_for_empty_term() {
        let state = loaded_state(vec![json!({"_id": "1"}), json!({"_id": "2"})]);
        assert!(!state.loading);
        assert_eq!(visible_ids(&state), vec!["1", "2"]);
    }

    #[test]
    fn test_search_term_recomputes_projection() {
        let mut state = loaded_state(vec![
            json!({"_id": "1", "region": "north"}),
            json!({"_id": "2", "region": "south"}),
        ]);
        state.set_search_term("SOUTH");
        assert_eq!(visible_ids(&state), vec!["2"]);
        state.set_search_term("");
        assert_eq!(visible_ids(&state), vec!["1", "2"]);
    }

    #[test]
    fn test_load_failure_keeps_cache_and_warns() {
        let mut state = loaded_state(vec![json!({"_id": "1"})]);
        state.apply_progress(StoreProgress::LoadFailed {
            error: "HTTP 500".to_string(),
        });
        assert_eq!(visible_ids(&state), vec!["1"]);
        assert_eq!(state.warnings, vec!["HTTP 500".to_string()]);
    }

    #[test]
    fn test_delete_flow() {
        let mut state = loaded_state(vec![json!({"_id": "a"}), json!({"_id": "b"})]);
        state.set_search_term("a");

        state.request_delete("a".to_string());
        assert!(state.take_delete_requests().is_empty());
        state.confirm_delete();
        assert_eq!(state.take_delete_requests(), vec!["a".to_string()]);
        assert!(state.deletes_in_flight.contains("a"));

        state.apply_progress(StoreProgress::Deleted { id: "a".to_string() });
        assert!(state.deletes_in_flight.is_empty());
        assert_eq!(state.cache.len(), 1);
        assert!(visible_ids(&state).is_empty());
    }

    #[test]
    fn test_cancelled_and_failed_delete_keep_record() {
        let mut state = loaded_state(vec![json!({"_id": "a"})]);
        state.request_delete("a".to_string());
        state.cancel_delete();
        state.confirm_delete();
        assert!(state.take_delete_requests().is_empty());

        state.request_delete("a".to_string());
        state.confirm_delete();
        state.take_delete_requests();
        state.apply_progress(StoreProgress::DeleteFailed {
            id: "a".to_string(),
            error: "HTTP 404".to_string(),
        });
        assert_eq!(visible_ids(&state), vec!["a"]);
        assert_eq!(state.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_confirm_is_not_resent() {
        let mut state = loaded_state(vec![json!({"_id": "a"})]);
        state.request_delete("a".to_string());
        state.confirm_delete();
        state.request_delete("a".to_string());
        state.confirm_delete();
        assert_eq!(state.take_delete_requests(), vec!["a".to_string()]);
    }

    #[test]
    fn test_request_edit_navigates() {
        let mut state = loaded_state(vec![json!({"_id": "a"})]);
        state.request_edit("a");
        assert_eq!(state.router.current(), &Route::Edit("a".to_string()));
        assert_eq!(state.cache.len(), 1);
    }

    #[test]
    fn test_csv_covers_only_filtered_records() {
        let mut state = loaded_state(vec![
            json!({"_id": "1", "author": {"username": "bob"}, "region": "north"}),
            json!({"_id": "2", "author": {"username": "amy"}, "region": "south"}),
        ]);
        state.set_search_term("south");
        let doc = state.csv_document_in(&Utc).unwrap();
        assert_eq!(doc.rows, 1);
        assert!(doc.text.contains(",amy,"));
        assert!(!doc.text.contains(",bob,"));
    }

    #[test]
    fn test_end_to_end_row() {
        let state = loaded_state(vec![json!({
            "_id": "1",
            "time": "2024-01-05T08:00:00Z",
            "createdAt": "2024-01-05T08:15:30Z",
            "author": {"username": "bob"},
            "region": "north",
            "sensorID": [1, 2],
            "profile": "p1",
            "duration": 5,
            "stoppage": "none",
            "measure": "m",
            "comment": "ok"
        })]);
        let doc = state.csv_document_in(&Utc).unwrap();
        assert_eq!(
            doc.text.lines().nth(1),
            Some("1/5/2024, 8:00:00 AM,1/5/2024, 8:15:30 AM,bob,5,north,1, 2,p1,none,m,ok")
        );
    }

    #[test]
    fn test_table_rows_follow_projection() {
        let mut state = loaded_state(vec![
            json!({"_id": "1", "author": {"username": "bob"}, "region": "north"}),
            json!({"_id": "2", "region": "south"}),
            json!({"_id": "3", "author": {"username": "amy"}, "region": "south"}),
        ]);
        assert_eq!(state.table_rows.len(), 3);

        state.set_search_term("south");
        assert_eq!(state.table_rows.len(), 2);
        assert_eq!(state.table_rows[0].id.as_deref(), Some("2"));
        assert!(state.table_rows[0].cells.is_err());
        let cells = state.table_rows[1].cells.as_ref().unwrap();
        assert_eq!(cells[2], "amy");
        assert_eq!(cells[4], "south");

        state.apply_progress(StoreProgress::Deleted { id: "3".to_string() });
        assert_eq!(state.table_rows.len(), 1);
    }

    #[test]
    fn test_worker_delete_path_matches_cache_remove() {
        use crate::app::cache::tests::FakeStore;

        let values = vec![json!({"_id": "a"}), json!({"_id": "b"}), json!({"_id": "c"})];

        let mut cache = LogCache::new();
        cache.replace(values.iter().cloned().map(record).collect());
        assert!(cache.remove(&FakeStore::default(), "b").unwrap());

        let mut state = loaded_state(values);
        state.request_delete("b".to_string());
        state.confirm_delete();
        state.take_delete_requests();
        state.apply_progress(StoreProgress::Deleted { id: "b".to_string() });

        assert_eq!(state.cache.records(), cache.records());
    }

    #[test]
    fn test_warning_cap() {
        let mut state = AppState::new(&AppConfig::default());
        for i in 0..constants::MAX_WARNINGS + 5 {
            state.push_warning(format!("w{i}"));
        }
        assert_eq!(state.warnings.len(), constants::MAX_WARNINGS);
        assert_eq!(state.warnings[0], "w5");
    }
}
