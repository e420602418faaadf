use super::error_code::{self, AtriumErrorCode};
use super::ConfigError;

/// Top-level error for every Atrium operation.
#[derive(Debug, thiserror::Error)]
pub enum AtriumError {
    #[error("capacity exceeded for {key}: needs {needed_bytes} bytes, ceiling {ceiling_bytes}")]
    CapacityExceeded {
        key: String,
        needed_bytes: u64,
        ceiling_bytes: u64,
    },

    #[error("construction failed for {key}: {reason}")]
    ConstructionFailed { key: String, reason: String },

    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("no factory registered for {key}")]
    FactoryNotRegistered { key: String },

    #[error("pool entry {id} not in use for type {type_tag}")]
    PoolEntryNotFound { type_tag: String, id: String },

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("scheduler error: {reason}")]
    SchedulerError { reason: String },

    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

impl AtriumError {
    /// Build a `ConstructionFailed` from any factory error.
    pub fn construction(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::ConstructionFailed {
            key: key.into(),
            reason: err.to_string(),
        }
    }

    /// Build a `ConcurrencyError` from a poisoned lock.
    pub fn poisoned(what: &str, err: impl std::fmt::Display) -> Self {
        Self::ConcurrencyError(format!("{what} lock poisoned: {err}"))
    }
}

impl AtriumErrorCode for AtriumError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => error_code::CAPACITY_EXCEEDED,
            Self::ConstructionFailed { .. } => error_code::CONSTRUCTION_FAILED,
            Self::InvalidKey { .. } => error_code::INVALID_KEY,
            Self::FactoryNotRegistered { .. } => error_code::FACTORY_NOT_REGISTERED,
            Self::PoolEntryNotFound { .. } => error_code::POOL_ENTRY_NOT_FOUND,
            Self::ConcurrencyError(_) => error_code::CONCURRENCY_ERROR,
            Self::SchedulerError { .. } => error_code::SCHEDULER_ERROR,
            Self::ConfigError(e) => e.error_code(),
        }
    }
}
