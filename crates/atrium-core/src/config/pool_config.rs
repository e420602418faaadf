use serde::{Deserialize, Serialize};

use super::{clamped_seconds, defaults};

/// Object pool caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum tracked instances (available + in use) per type tag.
    pub per_type_cap: usize,
    /// Maximum tracked instances across all type tags.
    pub global_cap: usize,
    /// Available instances idle longer than this are dropped (seconds).
    pub idle_ttl_secs: u64,
}

impl PoolConfig {
    pub fn idle_ttl(&self) -> chrono::Duration {
        clamped_seconds(self.idle_ttl_secs)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            per_type_cap: defaults::DEFAULT_POOL_PER_TYPE_CAP,
            global_cap: defaults::DEFAULT_POOL_GLOBAL_CAP,
            idle_ttl_secs: defaults::DEFAULT_POOL_IDLE_TTL_SECS,
        }
    }
}
