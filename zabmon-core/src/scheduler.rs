//! Refresh scheduler: drives the pipeline on a timer and on demand.
//!
//! One long-lived loop waits on interval expiry, a manual trigger or
//! shutdown. Each cycle runs as its own task so the loop (and whatever
//! consumes the update channel) stays responsive, but at most one cycle
//! is in flight at a time: a trigger that arrives mid-cycle is dropped,
//! not queued. The interval is re-read from the preference store at the
//! start of every wait, so a settings change applies on the next cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::MonitorError;
use crate::model::Problem;
use crate::pipeline;
use crate::prefs::{self, PrefStore};
use crate::rpc::RpcClient;

/// Lifecycle of a refresh cycle as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Fetching,
    Displaying,
    Error,
}

/// Snapshot handed to the presentation consumer over the update channel.
/// The consumer owns its copy; scheduler internals are never shared.
#[derive(Debug, Clone)]
pub struct DisplayUpdate {
    pub state: DisplayState,
    pub problems: Vec<Problem>,
    pub status: String,
}

impl DisplayUpdate {
    fn idle() -> Self {
        Self {
            state: DisplayState::Idle,
            problems: Vec::new(),
            status: "Waiting for data, refresh to fetch".to_string(),
        }
    }

    fn fetching() -> Self {
        Self {
            state: DisplayState::Fetching,
            problems: Vec::new(),
            status: "Refreshing...".to_string(),
        }
    }

    fn displaying(problems: Vec<Problem>) -> Self {
        let status = format!("Problems: {}", problems.len());
        Self {
            state: DisplayState::Displaying,
            problems,
            status,
        }
    }

    fn error(error: &MonitorError) -> Self {
        Self {
            state: DisplayState::Error,
            problems: Vec::new(),
            status: error.category_message().to_string(),
        }
    }
}

/// Handle for the presentation side: request a refresh, stop the loop.
#[derive(Clone)]
pub struct MonitorHandle {
    refresh_tx: mpsc::Sender<()>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl MonitorHandle {
    /// Requests an immediate refresh. Non-blocking; ignored when a cycle
    /// is already in flight.
    pub fn request_refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// The scheduler itself. Build with [`Monitor::new`], then hand the
/// returned receiver to the presentation layer and `run()` on a task.
pub struct Monitor {
    prefs: Arc<dyn PrefStore>,
    updates: mpsc::Sender<DisplayUpdate>,
    in_flight: Arc<AtomicBool>,
    refresh_rx: mpsc::Receiver<()>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Monitor {
    pub fn new(
        prefs: Arc<dyn PrefStore>,
    ) -> (Self, MonitorHandle, mpsc::Receiver<DisplayUpdate>) {
        let (updates_tx, updates_rx) = mpsc::channel(16);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let monitor = Monitor {
            prefs,
            updates: updates_tx,
            in_flight: Arc::new(AtomicBool::new(false)),
            refresh_rx,
            shutdown_rx,
        };
        let handle = MonitorHandle {
            refresh_tx,
            shutdown_tx: Arc::new(shutdown_tx),
        };
        (monitor, handle, updates_rx)
    }

    /// Timer loop. Runs until shutdown is signalled or the handle is
    /// dropped.
    pub async fn run(self) {
        let Monitor {
            prefs,
            updates,
            in_flight,
            mut refresh_rx,
            mut shutdown_rx,
        } = self;

        // initial snapshot so the consumer has something before the first cycle
        let _ = updates.send(DisplayUpdate::idle()).await;

        loop {
            let interval = prefs::effective_interval(prefs.as_ref());
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(interval)) => {
                    start_cycle(&prefs, &updates, &in_flight, "timer");
                }
                Some(()) = refresh_rx.recv() => {
                    start_cycle(&prefs, &updates, &in_flight, "manual");
                }
                _ = shutdown_rx.changed() => {
                    info!("scheduler stopping");
                    break;
                }
            }
        }
    }
}

/// One full fetch-resolve-join cycle against the configured server.
pub async fn run_cycle(prefs: &dyn PrefStore) -> Result<Vec<Problem>, MonitorError> {
    let config = prefs::server_config(prefs)?;
    let client = RpcClient::new(&config.endpoint, &config.token, config.timeout)?;
    pipeline::fetch_enriched(&client).await
}

fn start_cycle(
    prefs: &Arc<dyn PrefStore>,
    updates: &mpsc::Sender<DisplayUpdate>,
    in_flight: &Arc<AtomicBool>,
    origin: &'static str,
) {
    // mutual exclusion: at most one fetch-join sequence in flight
    if in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        debug!(origin, "refresh already in flight, trigger dropped");
        return;
    }

    let prefs = Arc::clone(prefs);
    let updates = updates.clone();
    let in_flight = Arc::clone(in_flight);

    tokio::spawn(async move {
        let _ = updates.send(DisplayUpdate::fetching()).await;

        let update = match run_cycle(prefs.as_ref()).await {
            Ok(problems) => {
                info!(origin, count = problems.len(), "refresh cycle complete");
                DisplayUpdate::displaying(problems)
            }
            Err(e) => {
                warn!(origin, "refresh cycle failed: {e}");
                DisplayUpdate::error(&e)
            }
        };
        let _ = updates.send(update).await;

        // released on every exit path; both arms funnel through here
        in_flight.store(false, Ordering::Release);
    });
}
