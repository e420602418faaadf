use serde::{Deserialize, Serialize};

use super::{clamped_seconds, defaults};
use crate::constants::BYTES_PER_MB;

/// Cache store limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of cached panels.
    pub max_entries: usize,
    /// Memory ceiling in megabytes.
    pub memory_ceiling_mb: u64,
    /// Multiplier over the ceiling a single oversized entry may reach.
    pub memory_slack: f64,
    /// Entries idle longer than this are expired (seconds).
    pub idle_ttl_secs: u64,
}

impl StoreConfig {
    /// Memory ceiling in bytes.
    pub fn memory_ceiling_bytes(&self) -> u64 {
        self.memory_ceiling_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Hard limit in bytes: ceiling times slack.
    pub fn hard_limit_bytes(&self) -> u64 {
        (self.memory_ceiling_bytes() as f64 * self.memory_slack) as u64
    }

    pub fn idle_ttl(&self) -> chrono::Duration {
        clamped_seconds(self.idle_ttl_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::DEFAULT_MAX_ENTRIES,
            memory_ceiling_mb: defaults::DEFAULT_MEMORY_CEILING_MB,
            memory_slack: defaults::DEFAULT_MEMORY_SLACK,
            idle_ttl_secs: defaults::DEFAULT_IDLE_TTL_SECS,
        }
    }
}
