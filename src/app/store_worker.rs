// CobbleLog - app/store_worker.rs
//
// Runs log store requests off the UI thread.
//
// Architecture:
//   - `StoreWorker` lives on the UI thread; each request runs on its own
//     short-lived background thread.
//   - Results come back as `StoreProgress` messages over an mpsc channel and
//     are applied to the cache by the UI thread only, so the cache has a
//     single writer and load/delete results can never race.
//   - An `Arc<AtomicBool>` shutdown flag is set when the view is torn down;
//     requests finishing after that drop their result instead of reporting it.

use crate::core::model::LogRecord;
use crate::core::store::LogStore;
use crate::util::error::MalformedRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

/// Messages from request threads to the UI thread.
#[derive(Debug)]
pub enum StoreProgress {
    /// The record set was fetched.
    Loaded {
        records: Vec<LogRecord>,
        malformed: Vec<MalformedRecord>,
    },

    /// The fetch failed; the cache must stay as it is.
    LoadFailed { error: String },

    /// The store confirmed deletion of `id`.
    Deleted { id: String },

    /// The store refused or never answered the delete of `id`.
    DeleteFailed { id: String, error: String },
}

/// Dispatches store requests to background threads.
pub struct StoreWorker {
    store: Arc<dyn LogStore>,
    progress_tx: mpsc::Sender<StoreProgress>,
    progress_rx: mpsc::Receiver<StoreProgress>,
    shutdown: Arc<AtomicBool>,
}

impl StoreWorker {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        let (progress_tx, progress_rx) = mpsc::channel();
        Self {
            store,
            progress_tx,
            progress_rx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fetch the full record set in the background.
    pub fn start_load(&self) {
        self.spawn("load", |store| match store.fetch_all() {
            Ok(fetched) => StoreProgress::Loaded {
                records: fetched.records,
                malformed: fetched.malformed,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching logs");
                StoreProgress::LoadFailed {
                    error: e.to_string(),
                }
            }
        });
    }

    /// Delete `id` from the store in the background.
    pub fn start_delete(&self, id: String) {
        self.spawn("delete", move |store| match store.delete(&id) {
            Ok(()) => StoreProgress::Deleted { id },
            Err(e) => {
                tracing::warn!(error = %e, id = %id, "Error deleting log");
                StoreProgress::DeleteFailed {
                    error: e.to_string(),
                    id,
                }
            }
        });
    }

    fn spawn<F>(&self, operation: &'static str, request: F)
    where
        F: FnOnce(&dyn LogStore) -> StoreProgress + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let tx = self.progress_tx.clone();
        let shutdown = Arc::clone(&self.shutdown);

        std::thread::spawn(move || {
            let message = request(store.as_ref());
            if shutdown.load(Ordering::SeqCst) {
                tracing::debug!(operation, "View closed; discarding store result");
                return;
            }
            // Receiver gone means the UI closed; exit quietly.
            let _ = tx.send(message);
        });

        tracing::debug!(operation, "Store request dispatched");
    }

    /// Poll for results without blocking. Returns all pending messages.
    pub fn poll_progress(&self) -> Vec<StoreProgress> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.progress_rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Stop reporting results. Requests already on the wire still complete,
    /// but nothing they return reaches the view.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
