use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use suggest_core::{FetchError, RequestId, Suggestion};

use crate::source::SuggestionSource;

// ---------------------------------------------------------------------------
// Work / Result types
// ---------------------------------------------------------------------------

pub(crate) enum FetchWork {
    Suggestions { query: String, id: RequestId },
    SavedInfo { value: String, id: RequestId },
}

#[derive(Debug)]
pub(crate) enum FetchOutcome {
    Suggestions {
        id: RequestId,
        result: Result<Vec<Suggestion>, FetchError>,
    },
    SavedInfo {
        id: RequestId,
        result: Result<Suggestion, FetchError>,
    },
}

/// Raw id of the newest submission per lane. 0 means nothing is wanted.
#[derive(Default)]
struct Generations {
    suggestions: AtomicU64,
    saved_info: AtomicU64,
}

impl Generations {
    fn is_current(&self, work: &FetchWork) -> bool {
        match work {
            FetchWork::Suggestions { id, .. } => {
                id.as_raw() == self.suggestions.load(Ordering::SeqCst)
            }
            FetchWork::SavedInfo { id, .. } => id.as_raw() == self.saved_info.load(Ordering::SeqCst),
        }
    }
}

// ---------------------------------------------------------------------------
// FetchWorker
// ---------------------------------------------------------------------------

/// Runs a `SuggestionSource` on a background thread so blocking fetches never
/// stall the caller. Results come back through `try_recv`/`recv_timeout` and
/// still have to pass the session's request guard.
pub(crate) struct FetchWorker {
    work_tx: mpsc::Sender<FetchWork>,
    result_rx: Mutex<mpsc::Receiver<FetchOutcome>>,
    generations: Arc<Generations>,
}

impl FetchWorker {
    pub fn spawn(source: Arc<dyn SuggestionSource>) -> io::Result<Self> {
        let generations = Arc::new(Generations::default());
        let (work_tx, work_rx) = mpsc::channel::<FetchWork>();
        let (result_tx, result_rx) = mpsc::channel::<FetchOutcome>();
        {
            let generations = Arc::clone(&generations);
            thread::Builder::new()
                .name("suggest-fetch".into())
                .spawn(move || fetch_worker(work_rx, result_tx, generations, source))?;
        }
        Ok(Self {
            work_tx,
            result_rx: Mutex::new(result_rx),
            generations,
        })
    }

    pub fn submit_suggestions(&self, query: String, id: RequestId) {
        self.generations
            .suggestions
            .store(id.as_raw(), Ordering::SeqCst);
        let _ = self.work_tx.send(FetchWork::Suggestions { query, id });
    }

    pub fn submit_saved_info(&self, value: String, id: RequestId) {
        self.generations
            .saved_info
            .store(id.as_raw(), Ordering::SeqCst);
        let _ = self.work_tx.send(FetchWork::SavedInfo { value, id });
    }

    /// Queued suggestion work is skipped; results already computed may still
    /// arrive and are dropped by the session guard.
    pub fn invalidate(&self) {
        self.generations.suggestions.store(0, Ordering::SeqCst);
    }

    pub fn invalidate_all(&self) {
        self.invalidate();
        self.generations.saved_info.store(0, Ordering::SeqCst);
    }

    pub fn try_recv(&self) -> Option<FetchOutcome> {
        let rx = self.result_rx.lock().ok()?;
        rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        let rx = self.result_rx.lock().ok()?;
        rx.recv_timeout(timeout).ok()
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

fn fetch_worker(
    rx: mpsc::Receiver<FetchWork>,
    tx: mpsc::Sender<FetchOutcome>,
    generations: Arc<Generations>,
    source: Arc<dyn SuggestionSource>,
) {
    while let Ok(work) = rx.recv() {
        // Drain: keep only the newest item of each lane
        let mut suggestions = None;
        let mut saved_info = None;
        let mut next = Some(work);
        while let Some(item) = next {
            match item {
                FetchWork::Suggestions { .. } => suggestions = Some(item),
                FetchWork::SavedInfo { .. } => saved_info = Some(item),
            }
            next = rx.try_recv().ok();
        }

        for work in [saved_info, suggestions].into_iter().flatten() {
            if !generations.is_current(&work) {
                trace!("skipping superseded fetch work");
                continue;
            }
            let outcome = match work {
                FetchWork::Suggestions { query, id } => {
                    debug!(query = query.as_str(), id = id.as_raw(), "fetching suggestions");
                    FetchOutcome::Suggestions {
                        id,
                        result: source.fetch_suggestions(&query),
                    }
                }
                FetchWork::SavedInfo { value, id } => {
                    debug!(value = value.as_str(), id = id.as_raw(), "fetching saved info");
                    FetchOutcome::SavedInfo {
                        id,
                        result: source.fetch_saved_info(&value),
                    }
                }
            };
            if tx.send(outcome).is_err() {
                return;
            }
        }
    }
}
