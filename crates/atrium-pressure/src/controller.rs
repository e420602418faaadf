//! PressureController: applies shed actions to the cache and the pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use atrium_core::config::PressureConfig;
use atrium_core::models::PressureLevel;
use atrium_core::traits::{IClock, IShedTarget, SystemClock};
use atrium_observability::pressure_span;
use atrium_observability::tracing_setup::events;

use crate::policy::{action_for, ShedAction};

/// Outcome of one handled signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureReport {
    pub level: PressureLevel,
    pub cache_evicted: usize,
    pub pool_evicted: usize,
    pub handled_at: DateTime<Utc>,
}

impl PressureReport {
    pub fn total_evicted(&self) -> usize {
        self.cache_evicted + self.pool_evicted
    }
}

/// Sheds memory from a cache and a pool in proportion to pressure.
pub struct PressureController {
    cache: Arc<dyn IShedTarget>,
    pool: Arc<dyn IShedTarget>,
    config: PressureConfig,
    clock: Arc<dyn IClock>,
    last_shed: Mutex<Option<DateTime<Utc>>>,
    handled: AtomicU64,
}

impl PressureController {
    pub fn new(
        cache: Arc<dyn IShedTarget>,
        pool: Arc<dyn IShedTarget>,
        config: PressureConfig,
    ) -> Self {
        Self::with_clock(cache, pool, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        cache: Arc<dyn IShedTarget>,
        pool: Arc<dyn IShedTarget>,
        config: PressureConfig,
        clock: Arc<dyn IClock>,
    ) -> Self {
        Self {
            cache,
            pool,
            config,
            clock,
            last_shed: Mutex::new(None),
            handled: AtomicU64::new(0),
        }
    }

    /// Act on one signal. `Normal` does nothing.
    pub fn handle(&self, level: PressureLevel) -> PressureReport {
        let _span = pressure_span!(level).entered();
        let now = self.clock.now();
        self.handled.fetch_add(1, Ordering::Relaxed);

        let (cache_evicted, pool_evicted) = match action_for(level, &self.config) {
            ShedAction::None => (0, 0),
            ShedAction::Fraction { cache, pool } => {
                (self.cache.shed_fraction(cache), self.pool.shed_fraction(pool))
            }
            ShedAction::All => (self.cache.shed_all(), self.pool.shed_all()),
        };

        if level != PressureLevel::Normal {
            let mut last = self.last_shed.lock().unwrap_or_else(|e| e.into_inner());
            *last = Some(now);
            events::pressure_handled(level, cache_evicted, pool_evicted);
        }

        PressureReport {
            level,
            cache_evicted,
            pool_evicted,
            handled_at: now,
        }
    }

    /// When the last non-normal signal was handled.
    pub fn last_shed_at(&self) -> Option<DateTime<Utc>> {
        *self.last_shed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a shed happened within `window` of now.
    pub fn shed_within(&self, window: Duration) -> bool {
        match self.last_shed_at() {
            Some(at) => self.clock.now() - at <= window,
            None => false,
        }
    }

    /// Signals handled so far, including `Normal`.
    pub fn signals_handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &PressureConfig {
        &self.config
    }
}

impl std::fmt::Debug for PressureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressureController")
            .field("cache", &self.cache.name())
            .field("pool", &self.pool.name())
            .field("config", &self.config)
            .finish()
    }
}
