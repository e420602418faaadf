//! Top-level Atrium configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    ObservabilityConfig, PoolConfig, PredictionConfig, PressureConfig, SchedulerConfig,
    StoreConfig,
};
use crate::constants::{MAX_DURATION_SECS, MAX_WORKER_THREADS};
use crate::errors::ConfigError;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "ATRIUM_";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ATRIUM_*`)
/// 2. Config file (`atrium.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AtriumConfig {
    pub store: StoreConfig,
    pub pool: PoolConfig,
    pub prediction: PredictionConfig,
    pub pressure: PressureConfig,
    pub scheduler: SchedulerConfig,
    pub observability: ObservabilityConfig,
}

impl AtriumConfig {
    /// Load configuration from an optional TOML file, then apply
    /// `ATRIUM_*` environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                let content =
                    std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                        path: p.display().to_string(),
                    })?;
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: p.display().to_string(),
                    message: e.to_string(),
                })?
            }
            None => Self::default(),
        };

        config.apply_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing and embedding).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `ATRIUM_<SECTION>_<FIELD>` overrides from an iterator of
    /// key/value pairs. Unknown keys are ignored.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "STORE_MAX_ENTRIES" => self.store.max_entries = parse(&key, &value)?,
                "STORE_MEMORY_CEILING_MB" => self.store.memory_ceiling_mb = parse(&key, &value)?,
                "STORE_MEMORY_SLACK" => self.store.memory_slack = parse(&key, &value)?,
                "STORE_IDLE_TTL_SECS" => self.store.idle_ttl_secs = parse(&key, &value)?,
                "POOL_PER_TYPE_CAP" => self.pool.per_type_cap = parse(&key, &value)?,
                "POOL_GLOBAL_CAP" => self.pool.global_cap = parse(&key, &value)?,
                "POOL_IDLE_TTL_SECS" => self.pool.idle_ttl_secs = parse(&key, &value)?,
                "PREDICTION_TOP_N" => self.prediction.top_n = parse(&key, &value)?,
                "PREDICTION_MIN_CONFIDENCE" => {
                    self.prediction.min_confidence = parse(&key, &value)?
                }
                "PREDICTION_WINDOW_SIZE" => self.prediction.window_size = parse(&key, &value)?,
                "SCHEDULER_WORKER_THREADS" => {
                    self.scheduler.worker_threads = parse(&key, &value)?
                }
                "SCHEDULER_MAX_IN_FLIGHT" => self.scheduler.max_in_flight = parse(&key, &value)?,
                "SCHEDULER_CLEANUP_INTERVAL_SECS" => {
                    self.scheduler.cleanup_interval_secs = parse(&key, &value)?
                }
                "LOG_LEVEL" => self.observability.log_level = value,
                "JSON_LOGS" => self.observability.json_logs = parse(&key, &value)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.max_entries == 0 {
            return Err(invalid("store.max_entries", "must be greater than 0"));
        }
        if self.store.memory_ceiling_mb == 0 {
            return Err(invalid("store.memory_ceiling_mb", "must be greater than 0"));
        }
        if !self.store.memory_slack.is_finite() || self.store.memory_slack < 1.0 {
            return Err(invalid(
                "store.memory_slack",
                "must be a finite value of at least 1.0",
            ));
        }
        if self.pool.per_type_cap == 0 {
            return Err(invalid("pool.per_type_cap", "must be greater than 0"));
        }
        if self.pool.global_cap < self.pool.per_type_cap {
            return Err(invalid(
                "pool.global_cap",
                "must be at least pool.per_type_cap",
            ));
        }
        for (field, value) in [
            ("prediction.min_confidence", self.prediction.min_confidence),
            (
                "prediction.diagnostic_min_confidence",
                self.prediction.diagnostic_min_confidence,
            ),
            (
                "pressure.warning_cache_fraction",
                self.pressure.warning_cache_fraction,
            ),
            (
                "pressure.warning_pool_fraction",
                self.pressure.warning_pool_fraction,
            ),
            (
                "pressure.critical_cache_fraction",
                self.pressure.critical_cache_fraction,
            ),
            (
                "pressure.critical_pool_fraction",
                self.pressure.critical_pool_fraction,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        if self.prediction.recorder_capacity == 0 {
            return Err(invalid(
                "prediction.recorder_capacity",
                "must be greater than 0",
            ));
        }
        if self.prediction.recorder_retain > self.prediction.recorder_capacity {
            return Err(invalid(
                "prediction.recorder_retain",
                "must not exceed prediction.recorder_capacity",
            ));
        }
        if !(1..=MAX_WORKER_THREADS).contains(&self.scheduler.worker_threads) {
            return Err(invalid("scheduler.worker_threads", "must be between 1 and 4"));
        }
        if self.scheduler.max_in_flight == 0 {
            return Err(invalid("scheduler.max_in_flight", "must be greater than 0"));
        }
        if self.scheduler.cleanup_interval_secs == 0 {
            return Err(invalid(
                "scheduler.cleanup_interval_secs",
                "must be greater than 0",
            ));
        }
        for (field, secs) in [
            ("store.idle_ttl_secs", self.store.idle_ttl_secs),
            ("pool.idle_ttl_secs", self.pool.idle_ttl_secs),
            (
                "scheduler.cleanup_interval_secs",
                self.scheduler.cleanup_interval_secs,
            ),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(invalid(field, "must not exceed one year"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::ParseError {
        path: key.to_string(),
        message: format!("cannot parse '{value}'"),
    })
}
