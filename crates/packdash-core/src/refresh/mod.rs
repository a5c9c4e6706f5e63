//! Background refresh of the current-shift payload.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dashboard::{Dashboard, RefreshOutcome};
use crate::kpi::types::Selector;

/// Counters shared between the refresher task and its observers.
#[derive(Debug, Default)]
pub struct RefreshStats {
    cycles: AtomicU64,
    published: AtomicU64,
    failures: AtomicU64,
}

impl RefreshStats {
    /// Completed cycles, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Rebuilds [`Selector::Current`] on a fixed interval until cancelled.
pub struct Refresher {
    dashboard: Arc<Dashboard>,
    interval: Duration,
    stats: Arc<RefreshStats>,
}

impl Refresher {
    pub fn new(dashboard: Arc<Dashboard>, interval: Duration) -> Self {
        Self {
            dashboard,
            interval,
            stats: Arc::new(RefreshStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<RefreshStats> {
        Arc::clone(&self.stats)
    }

    /// Start the loop on the current runtime. The first cycle runs
    /// immediately; a failed cycle waits the same interval as a good one.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                event = "core.refresh.started",
                interval_secs = self.interval.as_secs()
            );

            loop {
                self.cycle().await;

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }

            info!(
                event = "core.refresh.stopped",
                cycles = self.stats.cycles(),
                failures = self.stats.failures()
            );
        })
    }

    async fn cycle(&self) {
        match self.dashboard.refresh(Selector::Current).await {
            RefreshOutcome::Published(payload) => {
                self.stats.published.fetch_add(1, Ordering::Relaxed);
                info!(
                    event = "core.refresh.cycle_completed",
                    header = %payload.header,
                    built_at = %payload.built_at
                );
            }
            RefreshOutcome::KeptPrevious { reason } => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!(event = "core.refresh.cycle_failed", reason = %reason);
            }
        }
        self.stats.cycles.fetch_add(1, Ordering::Relaxed);
    }
}
