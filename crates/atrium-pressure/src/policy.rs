//! Level → shed action mapping.

use atrium_core::config::PressureConfig;
use atrium_core::models::PressureLevel;

/// What to shed for one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShedAction {
    None,
    Fraction { cache: f64, pool: f64 },
    All,
}

pub fn action_for(level: PressureLevel, config: &PressureConfig) -> ShedAction {
    match level {
        PressureLevel::Normal => ShedAction::None,
        PressureLevel::Warning => ShedAction::Fraction {
            cache: config.warning_cache_fraction,
            pool: config.warning_pool_fraction,
        },
        PressureLevel::Critical => ShedAction::Fraction {
            cache: config.critical_cache_fraction,
            pool: config.critical_pool_fraction,
        },
        PressureLevel::Urgent => ShedAction::All,
    }
}
