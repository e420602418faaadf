//! Eviction counters by reason, fed by store events.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use atrium_core::models::CacheKey;
use atrium_core::traits::{EvictionReason, IStoreEventHandler};

/// Per-reason eviction counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvictionCounts {
    pub capacity: u64,
    pub memory: u64,
    pub expired: u64,
    pub pressure: u64,
    pub explicit: u64,
    pub cleared: u64,
    pub replaced: u64,
    pub bytes_released: u64,
}

/// Store event handler tallying evictions.
#[derive(Debug, Default)]
pub struct EvictionMetrics {
    capacity: AtomicU64,
    memory: AtomicU64,
    expired: AtomicU64,
    pressure: AtomicU64,
    explicit: AtomicU64,
    cleared: AtomicU64,
    replaced: AtomicU64,
    bytes_released: AtomicU64,
    inserted: AtomicU64,
    speculative_inserted: AtomicU64,
}

impl EvictionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, reason: EvictionReason) -> &AtomicU64 {
        match reason {
            EvictionReason::Capacity => &self.capacity,
            EvictionReason::Memory => &self.memory,
            EvictionReason::Expired => &self.expired,
            EvictionReason::Pressure => &self.pressure,
            EvictionReason::Explicit => &self.explicit,
            EvictionReason::Cleared => &self.cleared,
            EvictionReason::Replaced => &self.replaced,
        }
    }

    pub fn count(&self, reason: EvictionReason) -> u64 {
        self.counter(reason).load(Ordering::Relaxed)
    }

    pub fn inserted(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    pub fn speculative_inserted(&self) -> u64 {
        self.speculative_inserted.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> EvictionCounts {
        EvictionCounts {
            capacity: self.count(EvictionReason::Capacity),
            memory: self.count(EvictionReason::Memory),
            expired: self.count(EvictionReason::Expired),
            pressure: self.count(EvictionReason::Pressure),
            explicit: self.count(EvictionReason::Explicit),
            cleared: self.count(EvictionReason::Cleared),
            replaced: self.count(EvictionReason::Replaced),
            bytes_released: self.bytes_released.load(Ordering::Relaxed),
        }
    }
}

impl IStoreEventHandler for EvictionMetrics {
    fn on_inserted(&self, _key: &CacheKey, _bytes: u64, speculative: bool) {
        self.inserted.fetch_add(1, Ordering::Relaxed);
        if speculative {
            self.speculative_inserted.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_evicted(&self, _key: &CacheKey, bytes: u64, reason: EvictionReason) {
        self.counter(reason).fetch_add(1, Ordering::Relaxed);
        self.bytes_released.fetch_add(bytes, Ordering::Relaxed);
    }
}
