// CobbleLog - app/cache.rs
//
// In-memory log collection. Filled wholesale by a fetch, pruned one record at
// a time after the store confirms a delete. Never reordered locally.

use crate::core::model::LogRecord;
use crate::core::store::LogStore;
use crate::util::error::{MalformedRecord, StoreError};

/// Ordered cache of the records the store returned.
#[derive(Debug, Clone, Default)]
pub struct LogCache {
    records: Vec<LogRecord>,
}

impl LogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the record with `id`, if cached.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.id().as_deref() == Some(id))
    }

    /// Record with `id`, if cached.
    pub fn get(&self, id: &str) -> Option<&LogRecord> {
        self.position(id).and_then(|idx| self.records.get(idx))
    }

    /// Replace the contents with a freshly fetched sequence, keeping its order.
    pub fn replace(&mut self, records: Vec<LogRecord>) {
        tracing::debug!(old = self.records.len(), new = records.len(), "Cache replaced");
        self.records = records;
    }

    /// Drop the first record with `id`. Returns false when no record matched.
    pub fn remove_local(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.records.remove(idx);
                tracing::debug!(id, remaining = self.records.len(), "Removed record from cache");
                true
            }
            None => false,
        }
    }

    /// Fetch every record from `store` and replace the cache.
    ///
    /// On failure the cache is left as it was and the error is logged and
    /// returned. There is no retry. On success, returns the elements the
    /// store sent that were not records.
    pub fn load(&mut self, store: &dyn LogStore) -> Result<Vec<MalformedRecord>, StoreError> {
        match store.fetch_all() {
            Ok(fetched) => {
                self.replace(fetched.records);
                Ok(fetched.malformed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching logs; cache unchanged");
                Err(e)
            }
        }
    }

    /// Delete `id` remotely, then locally.
    ///
    /// The local entry is only removed after the store reports success, so
    /// the cache never hides a record the store still holds. Returns whether
    /// a cached record was removed.
    ///
    /// This is the synchronous form used by callers that own the cache on
    /// one thread. The GUI splits the same two steps: `StoreWorker::start_delete`
    /// runs the remote call off the UI thread, and `AppState::apply_progress`
    /// calls `remove_local` only when `StoreProgress::Deleted` arrives.
    pub fn remove(&mut self, store: &dyn LogStore, id: &str) -> Result<bool, StoreError> {
        match store.delete(id) {
            Ok(()) => Ok(self.remove_local(id)),
            Err(e) => {
                tracing::warn!(error = %e, id, "Error deleting log; cache unchanged");
                Err(e)
            }
        }
    }
}
