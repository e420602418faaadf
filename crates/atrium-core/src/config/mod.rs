//! Configuration for Atrium.
//! TOML-based, 3-layer resolution: env > file > defaults.

pub mod atrium_config;
pub mod defaults;
pub mod observability_config;
pub mod pool_config;
pub mod prediction_config;
pub mod pressure_config;
pub mod scheduler_config;
pub mod store_config;

pub use atrium_config::AtriumConfig;
pub use observability_config::ObservabilityConfig;
pub use pool_config::PoolConfig;
pub use prediction_config::PredictionConfig;
pub use pressure_config::PressureConfig;
pub use scheduler_config::SchedulerConfig;
pub use store_config::StoreConfig;

/// Seconds to a `chrono::Duration`, clamped to `MAX_DURATION_SECS`.
pub(crate) fn clamped_seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(crate::constants::MAX_DURATION_SECS) as i64)
}
