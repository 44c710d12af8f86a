//! Background loaders for the bulk list and the per-user detail.
//!
//! Each request runs on a short-lived worker thread and reports back over an
//! mpsc channel that the event loop drains every tick. Results that no longer
//! match what the view asked for are dropped instead of applied.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::error::{DetailError, FetchError};
use crate::source::{self, DataSource, UserDetail, UserSummary};

/// Artificial wait before a detail fetch is issued.
pub const DETAIL_DELAY: Duration = Duration::from_millis(500);

fn spawn_worker<F>(name: &str, job: F) -> std::io::Result<()>
where
    F: FnOnce() + Send + 'static,
{
    std::thread::Builder::new()
        .name(name.to_string())
        .spawn(job)
        .map(|_| ())
}

struct BulkMessage {
    generation: u64,
    result: Result<Vec<UserSummary>, FetchError>,
}

/// Loads the whole users list. Only the most recent request is ever committed.
pub struct BulkLoader {
    source: Arc<dyn DataSource>,
    generation: u64,
    loading: bool,
    tx: Sender<BulkMessage>,
    rx: Receiver<BulkMessage>,
}

impl BulkLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            generation: 0,
            loading: false,
            tx,
            rx,
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Issue a new request, superseding any one still in flight.
    pub fn start(&mut self) {
        self.generation += 1;
        self.loading = true;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::info!(generation, source = %source.describe(), "loading users");
        let spawned = spawn_worker("bulk-fetch", move || {
            let result = source::fetch_all(source.as_ref());
            let _ = tx.send(BulkMessage { generation, result });
        });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn bulk fetch worker");
            let _ = self.tx.send(BulkMessage {
                generation,
                result: Err(FetchError::Transport(e.to_string())),
            });
        }
    }

    /// Drain finished requests and return the outcome of the current one, if it arrived.
    pub fn poll(&mut self) -> Option<Result<Vec<UserSummary>, FetchError>> {
        let mut outcome = None;
        while let Ok(msg) = self.rx.try_recv() {
            if msg.generation != self.generation {
                tracing::debug!(stale = msg.generation, current = self.generation, "dropping stale users response");
                continue;
            }
            self.loading = false;
            outcome = Some(msg.result);
        }
        outcome
    }
}

/// What the detail overlay currently has to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading,
    Loaded(UserDetail),
    Failed(DetailError),
}

struct DetailMessage {
    id: String,
    result: Result<UserDetail, DetailError>,
}

/// Loads one user's detail for the overlay.
pub struct DetailLoader {
    source: Arc<dyn DataSource>,
    delay: Duration,
    selected: Option<String>,
    state: DetailState,
    tx: Sender<DetailMessage>,
    rx: Receiver<DetailMessage>,
}

impl DetailLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self::with_delay(source, DETAIL_DELAY)
    }

    pub fn with_delay(source: Arc<dyn DataSource>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            delay,
            selected: None,
            state: DetailState::Idle,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select `id`, reset to loading and fetch it in the background.
    pub fn open(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.state = DetailState::Loading;
        let id = id.to_string();
        let source = Arc::clone(&self.source);
        let delay = self.delay;
        let tx = self.tx.clone();
        tracing::debug!(%id, "loading user detail");
        let worker_id = id.clone();
        let spawned = spawn_worker("detail-fetch", move || {
            std::thread::sleep(delay);
            let result = source::fetch_detail(source.as_ref(), &worker_id);
            let _ = tx.send(DetailMessage {
                id: worker_id,
                result,
            });
        });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn detail fetch worker");
            self.state = DetailState::Failed(FetchError::Transport(e.to_string()).into());
        }
    }

    /// Forget the selection; anything still in flight will be dropped on arrival.
    pub fn close(&mut self) {
        self.selected = None;
        self.state = DetailState::Idle;
    }

    /// Apply finished requests. Returns true if the visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.accept(msg);
        }
        changed
    }

    fn accept(&mut self, msg: DetailMessage) -> bool {
        if self.selected.as_deref() != Some(msg.id.as_str()) {
            tracing::debug!(id = %msg.id, selected = ?self.selected, "dropping detail for stale selection");
            return false;
        }
        self.state = match msg.result {
            Ok(detail) => DetailState::Loaded(detail),
            Err(e) => {
                tracing::warn!(id = %msg.id, error = %e, "user detail failed");
                DetailState::Failed(e)
            }
        };
        true
    }
}
