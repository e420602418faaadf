//! Background prefetch outcome counters.

use std::sync::atomic::{AtomicU64, Ordering};

use atrium_core::models::PrefetchStatistics;

/// Counts what happened to every prefetch the scheduler was asked to run.
///
/// `scheduled = completed + failed + discarded + in flight`; `skipped`
/// counts requests that never got scheduled (no permit, already in flight,
/// scheduler stopped).
#[derive(Debug, Default)]
pub struct PrefetchMetrics {
    scheduled: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
    skipped: AtomicU64,
}

impl PrefetchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scheduled(&self) {
        self.scheduled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Built but not stored: stale generation, slot already filled, or too big.
    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PrefetchStatistics {
        PrefetchStatistics {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Prefetches scheduled but not yet finished.
    pub fn in_flight(&self) -> u64 {
        let s = self.snapshot();
        let settled = s.completed + s.failed + s.discarded;
        s.scheduled.saturating_sub(settled)
    }
}
