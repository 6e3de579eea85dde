use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::directory::{load_dataset, Dataset, SheetSource};
use crate::utils::DirectoryError;

/// Where the current load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    Idle,
    Loading,
    Ready,
    /// The latest load failed; the message is shown in the error panel
    Failed(String),
}

/// Result of one spawned load, tagged with the ticket it was issued under
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: u64,
    pub result: Result<Dataset, DirectoryError>,
}

/// Owns the current dataset snapshot.
///
/// A failed load keeps the previous snapshot and flags the error. Results
/// from superseded tickets are dropped.
#[derive(Debug)]
pub struct LoadState {
    dataset: Arc<Dataset>,
    status: LoadStatus,
    latest_ticket: u64,
    last_error: Option<String>,
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadState {
    pub fn new() -> Self {
        Self {
            dataset: Arc::new(Dataset::default()),
            status: LoadStatus::Idle,
            latest_ticket: 0,
            last_error: None,
        }
    }

    /// Start a new load and return its ticket
    pub fn begin(&mut self) -> u64 {
        self.latest_ticket += 1;
        self.status = LoadStatus::Loading;
        self.latest_ticket
    }

    /// Apply a finished load. Returns true when the dataset was replaced.
    pub fn finish(&mut self, ticket: u64, result: Result<Dataset, DirectoryError>) -> bool {
        if ticket != self.latest_ticket {
            debug!(
                "Ignoring load #{} (latest is #{})",
                ticket, self.latest_ticket
            );
            return false;
        }

        match result {
            Ok(dataset) => {
                self.dataset = Arc::new(dataset);
                self.status = LoadStatus::Ready;
                self.last_error = None;
                true
            }
            Err(e) => {
                if e.is_load_failure() {
                    warn!(
                        "Load #{} failed, keeping {} cached records: {}",
                        ticket,
                        self.dataset.len(),
                        e
                    );
                } else {
                    error!("Load #{} could not start: {}", ticket, e);
                }
                let message = e.to_string();
                self.status = LoadStatus::Failed(message.clone());
                self.last_error = Some(message);
                false
            }
        }
    }

    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        self.finish(outcome.ticket, outcome.result)
    }

    /// Leave the error panel and browse the retained data
    pub fn dismiss_error(&mut self) {
        if matches!(self.status, LoadStatus::Failed(_)) {
            self.status = LoadStatus::Ready;
        }
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// True while showing data older than a failed reload
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Run a load on the runtime and post the outcome back to the UI loop
pub fn spawn_load(
    source: Arc<dyn SheetSource>,
    ticket: u64,
    tx: mpsc::Sender<LoadOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = load_dataset(source.as_ref()).await;
        if tx.send(LoadOutcome { ticket, result }).await.is_err() {
            debug!("UI closed before load #{} finished", ticket);
        }
    })
}
