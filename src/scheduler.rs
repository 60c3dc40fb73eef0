//! Refresh coordination: single-flight cycles, the interval loop, and the
//! TTL-gated lazy variant.
//!
//! [`NewsHub`] ties the orchestrator to the cache store and is the only writer
//! the store ever sees. A refresh cycle assembles a complete snapshot and
//! swaps it in; readers are never blocked by an in-flight cycle and always get
//! the last complete snapshot.
//!
//! # Refresh Policies
//!
//! Two policies exist across deployments and both live here:
//!
//! - **Interval-driven** ([`RefreshScheduler`]): refresh immediately at
//!   startup, then on a fixed wall-clock interval. Used by the daemon.
//! - **TTL-gated** ([`NewsHub::fresh_snapshot`]): refresh lazily on read when
//!   the snapshot has outlived the TTL. Used by one-shot invocations.
//!
//! Concurrent triggers collapse to one cycle: whichever caller loses the
//! try-lock gets [`RefreshOutcome::SkippedInFlight`] and moves on.

use crate::cache::CacheStore;
use crate::models::CacheSnapshot;
use crate::orchestrator::Orchestrator;
use crate::outputs::json;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

/// How a refresh trigger resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was assembled and swapped into the store.
    Completed,
    /// Another cycle was already running; this trigger was a no-op.
    SkippedInFlight,
    /// Every strategy of every category produced nothing; the previous
    /// snapshot was left untouched.
    NothingFetched,
}

/// The pipeline's hub: sole writer of the cache store, shared by handle.
pub struct NewsHub {
    store: CacheStore,
    orchestrator: Orchestrator,
    refresh_gate: Mutex<()>,
}

impl NewsHub {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            store: CacheStore::new(),
            orchestrator,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Read the current snapshot. Never blocks on an in-flight refresh.
    pub async fn snapshot(&self) -> CacheSnapshot {
        self.store.read().await
    }

    /// Run one refresh cycle, unless one is already running.
    ///
    /// A cycle that comes back completely empty keeps the previous snapshot
    /// in place, so clients keep getting stale-but-available data.
    #[instrument(level = "info", skip_all)]
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            info!("Refresh already in flight; skipping this trigger");
            return RefreshOutcome::SkippedInFlight;
        };

        let started = std::time::Instant::now();
        let snapshot = self.orchestrator.assemble().await;

        if snapshot.is_empty() {
            warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Refresh produced nothing; keeping the previous snapshot"
            );
            return RefreshOutcome::NothingFetched;
        }

        self.store.replace(snapshot).await;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Refresh cycle completed"
        );
        RefreshOutcome::Completed
    }

    /// TTL-gated read: refresh first when the snapshot has gone stale.
    ///
    /// A snapshot younger than `ttl` is returned as-is without touching any
    /// upstream. A store that has never been filled counts as stale.
    pub async fn fresh_snapshot(&self, ttl: Duration) -> CacheSnapshot {
        let snapshot = self.store.read().await;
        if let Some(last_updated) = snapshot.last_updated {
            let age = Utc::now().signed_duration_since(last_updated);
            if age.to_std().map(|age| age < ttl).unwrap_or(true) {
                return snapshot;
            }
        }
        self.refresh().await;
        self.store.read().await
    }
}

/// Interval-driven background refresh loop.
///
/// Ticks immediately at startup and then at a fixed period. After each
/// completed cycle the snapshot is optionally serialized to a JSON file for
/// an external file server to pick up.
pub struct RefreshScheduler {
    hub: Arc<NewsHub>,
    interval: Duration,
    json_output_dir: Option<String>,
}

impl RefreshScheduler {
    pub fn new(hub: Arc<NewsHub>, interval: Duration, json_output_dir: Option<String>) -> Self {
        Self {
            hub,
            interval,
            json_output_dir,
        }
    }

    /// Run the loop forever. A cycle that fails entirely leaves the previous
    /// snapshot serving and the loop keeps ticking.
    #[instrument(level = "info", skip_all, fields(interval_secs = self.interval.as_secs()))]
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = self.hub.refresh().await;
            info!(?outcome, "Scheduled refresh finished");

            if outcome == RefreshOutcome::Completed {
                if let Some(dir) = &self.json_output_dir {
                    let snapshot = self.hub.snapshot().await;
                    if let Err(e) = json::write_snapshot(&snapshot, dir).await {
                        error!(error = %e, "Failed to write snapshot JSON");
                    }
                }
            }
        }
    }
}
