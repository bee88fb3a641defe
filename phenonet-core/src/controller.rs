//! Debounced recomputation of a view as its parameters change.
//!
//! Parameter updates land in a `watch` channel. A background task waits for
//! the channel to stay quiet for the debounce window, then runs one filter
//! pass with the latest parameters and publishes the snapshot. Intermediate
//! values in a burst are never computed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::pipeline::{ViewParams, ViewSnapshot};
use crate::view::GraphView;

/// Owns the current parameters and the latest snapshot of one view.
#[derive(Debug)]
pub struct FilterController {
    params_tx: watch::Sender<ViewParams>,
    snapshot_rx: watch::Receiver<Arc<ViewSnapshot>>,
    task: JoinHandle<()>,
}

impl FilterController {
    /// Compute the initial snapshot (generation 0) and start the debounce
    /// task. Must be called from within a tokio runtime.
    pub fn spawn(view: Arc<dyn GraphView>, initial: ViewParams, window: Duration) -> Self {
        let first = view.derive(&initial);
        let (params_tx, params_rx) = watch::channel(initial);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(first));

        info!(view = view.name(), window = ?window, "Started filter controller");
        let task = tokio::spawn(debounce_loop(view, params_rx, snapshot_tx, window));

        Self {
            params_tx,
            snapshot_rx,
            task,
        }
    }

    /// Replace the parameters. Last write wins.
    pub fn set_params(&self, params: ViewParams) {
        self.params_tx.send_replace(params);
    }

    /// Change the parameters in place, e.g. move one slider.
    pub fn update(&self, modify: impl FnOnce(&mut ViewParams)) {
        self.params_tx.send_modify(modify);
    }

    pub fn params(&self) -> ViewParams {
        self.params_tx.borrow().clone()
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> Arc<ViewSnapshot> {
        Arc::clone(&self.snapshot_rx.borrow())
    }

    /// A receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewSnapshot>> {
        self.snapshot_rx.clone()
    }

    /// Stop the background task. A pending burst is discarded.
    pub async fn shutdown(self) {
        let Self { params_tx, task, .. } = self;
        drop(params_tx);
        if let Err(e) = task.await {
            debug!(error = %e, "Filter controller task ended abnormally");
        }
    }
}

async fn debounce_loop(
    view: Arc<dyn GraphView>,
    mut params_rx: watch::Receiver<ViewParams>,
    snapshot_tx: watch::Sender<Arc<ViewSnapshot>>,
    window: Duration,
) {
    let mut generation = 0u64;

    while params_rx.changed().await.is_ok() {
        // Restart the window on every further change.
        loop {
            tokio::select! {
                changed = params_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                () = tokio::time::sleep(window) => break,
            }
        }

        let params = params_rx.borrow_and_update().clone();
        generation += 1;
        let start = Instant::now();
        let mut snapshot = view.derive(&params);
        snapshot.generation = generation;

        debug!(
            view = view.name(),
            generation,
            nodes = snapshot.graph.nodes.len(),
            edges = snapshot.graph.edges.len(),
            duration = ?start.elapsed(),
            "Published snapshot"
        );
        snapshot_tx.send_replace(Arc::new(snapshot));
    }
}
