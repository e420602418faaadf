//! Read-only statistics views. Observability only, never used for correctness.

use serde::{Deserialize, Serialize};

/// Cache store counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_memory_bytes: u64,
    pub entry_count: usize,
    /// Entries inserted by prefetch.
    pub preload_count: u64,
}

impl CacheStatistics {
    /// hits / (hits + misses), 0.0 when there were no lookups.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.hits + self.misses)
    }
}

/// Object pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStatistics {
    pub acquires: u64,
    pub reuses: u64,
    pub available: usize,
    pub in_use: usize,
    pub evictions: u64,
}

impl PoolStatistics {
    /// Share of acquires served by a reused instance.
    pub fn reuse_rate(&self) -> f64 {
        ratio(self.reuses, self.acquires)
    }
}

/// Background prefetch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefetchStatistics {
    pub scheduled: u64,
    pub completed: u64,
    pub failed: u64,
    pub discarded: u64,
    pub skipped: u64,
}

/// Combined snapshot returned to hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub cache: CacheStatistics,
    pub pool: PoolStatistics,
    pub prefetch: PrefetchStatistics,
    pub recorded_events: usize,
}

impl StatisticsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        self.cache.hit_rate()
    }

    pub fn reuse_rate(&self) -> f64 {
        self.pool.reuse_rate()
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
