use serde::{Deserialize, Serialize};

use super::defaults;

/// Fractions shed per pressure level. `urgent` always clears everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    pub warning_cache_fraction: f64,
    pub warning_pool_fraction: f64,
    pub critical_cache_fraction: f64,
    pub critical_pool_fraction: f64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            warning_cache_fraction: defaults::DEFAULT_WARNING_CACHE_FRACTION,
            warning_pool_fraction: defaults::DEFAULT_WARNING_POOL_FRACTION,
            critical_cache_fraction: defaults::DEFAULT_CRITICAL_CACHE_FRACTION,
            critical_pool_fraction: defaults::DEFAULT_CRITICAL_POOL_FRACTION,
        }
    }
}
