//! Single-snapshot cache store.
//!
//! Holds exactly one [`CacheSnapshot`] behind an async RwLock. Refresh cycles
//! assemble a complete snapshot first and swap it in with one short write
//! lock, so readers never observe a half-updated result set. Reads hand out
//! clones; nothing outside this module can mutate the cached data.

use crate::models::CacheSnapshot;
use tokio::sync::RwLock;

/// Owner of the one cached result set.
///
/// Created once at startup and shared by handle; the scheduler writes, the
/// query surface reads, and there is no teardown beyond process exit.
#[derive(Debug, Default)]
pub struct CacheStore {
    inner: RwLock<CacheSnapshot>,
}

impl CacheStore {
    /// An empty store: both category lists empty, no `lastUpdated`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out the current snapshot.
    pub async fn read(&self) -> CacheSnapshot {
        self.inner.read().await.clone()
    }

    /// Replace the snapshot wholesale.
    pub async fn replace(&self, snapshot: CacheSnapshot) {
        *self.inner.write().await = snapshot;
    }
}
