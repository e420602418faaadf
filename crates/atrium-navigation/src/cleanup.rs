//! Periodic TTL sweep over the cache and the pool.

use std::sync::Arc;

use serde::Serialize;

use atrium_observability::eviction_span;
use atrium_observability::tracing_setup::events;
use atrium_pool::ObjectPool;
use atrium_pressure::PressureController;
use atrium_store::CacheStore;

/// What one cleanup pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// A pressure shed ran within the last interval, so nothing was swept.
    pub skipped: bool,
    pub cache_expired: usize,
    pub pool_dropped: usize,
}

/// Sweeps idle cache entries and pooled objects.
pub struct CleanupTask<P> {
    store: Arc<CacheStore<P>>,
    pool: Arc<ObjectPool<P>>,
    pressure: Arc<PressureController>,
    interval: chrono::Duration,
}

impl<P: Clone + Send + Sync + 'static> CleanupTask<P> {
    pub fn new(
        store: Arc<CacheStore<P>>,
        pool: Arc<ObjectPool<P>>,
        pressure: Arc<PressureController>,
        interval: chrono::Duration,
    ) -> Self {
        Self {
            store,
            pool,
            pressure,
            interval,
        }
    }

    pub fn interval(&self) -> chrono::Duration {
        self.interval
    }

    pub fn run(&self) -> CleanupReport {
        let _span = eviction_span!("cleanup").entered();
        if self.pressure.shed_within(self.interval) {
            tracing::debug!("pressure shed ran recently, cleanup skipped");
            return CleanupReport {
                skipped: true,
                ..CleanupReport::default()
            };
        }
        let cache_expired = self.store.sweep_expired();
        let pool_dropped = self.pool.cleanup_idle();
        events::cleanup_completed(cache_expired, pool_dropped);
        CleanupReport {
            skipped: false,
            cache_expired,
            pool_dropped,
        }
    }
}

impl<P> std::fmt::Debug for CleanupTask<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupTask")
            .field("interval", &self.interval)
            .finish()
    }
}
