//! Watch mode: repeated sync passes until shutdown.
//!
//! The loop checks a [`Shutdown`] flag between passes and races its sleep
//! against the same flag, so an interrupt ends the wait immediately. A pass
//! that is already running is allowed to finish.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch as signal;
use tracing::{debug, info};

use crate::sync::engine::SyncEngine;
use crate::sync::types::{SyncReport, WatchSummary};
use crate::wiki::WikiApi;

/// Cloneable cancellation flag shared between the watch loop and whoever
/// decides to stop it (a Ctrl+C handler in the CLI).
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<signal::Sender<bool>>,
}

impl Shutdown {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = signal::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once shutdown has been requested.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Sync `dir` every `interval` until `shutdown` fires.
///
/// `on_pass` is called after each pass with its 1-based number and report.
/// `sync_directory` cannot fail as a whole: a missing directory, unreadable
/// entries and per-file failures are all logged and folded into the report.
/// So a bad pass is reported through `on_pass` and never ends the loop.
pub async fn watch<A, F>(
    engine: &mut SyncEngine<A>,
    dir: &Path,
    interval: Duration,
    shutdown: &Shutdown,
    mut on_pass: F,
) -> WatchSummary
where
    A: WikiApi,
    F: FnMut(u64, &SyncReport),
{
    let mut summary = WatchSummary::default();
    info!(dir = %dir.display(), interval_secs = interval.as_secs(), "Watching for changes");

    loop {
        if shutdown.is_triggered() {
            break;
        }

        let report = engine.sync_directory(dir, false).await;
        summary.passes += 1;
        summary.published += report.published();
        debug!(
            pass = summary.passes,
            published = report.published(),
            failed = report.failed(),
            "Pass complete"
        );
        on_pass(summary.passes, &report);

        if shutdown.is_triggered() {
            break;
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = shutdown.triggered() => break,
        }
    }

    info!(passes = summary.passes, "Stopped watching");
    summary
}
