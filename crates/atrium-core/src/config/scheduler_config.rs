use serde::{Deserialize, Serialize};

use super::{clamped_seconds, defaults};

/// Background prefetch and cleanup scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Worker threads for the background runtime (1–4).
    pub worker_threads: usize,
    /// Maximum prefetch constructions running at once.
    pub max_in_flight: usize,
    /// Interval between periodic TTL sweeps (seconds).
    pub cleanup_interval_secs: u64,
}

impl SchedulerConfig {
    /// Cleanup interval, never shorter than one second.
    pub fn cleanup_interval(&self) -> chrono::Duration {
        clamped_seconds(self.cleanup_interval_secs.max(1))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: defaults::DEFAULT_WORKER_THREADS,
            max_in_flight: defaults::DEFAULT_MAX_IN_FLIGHT,
            cleanup_interval_secs: defaults::DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}
