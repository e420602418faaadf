//! Stable error codes for host-facing error reporting.

/// Every Atrium error enum exposes a structured code string so hosts can
/// branch on the failure without parsing messages.
pub trait AtriumErrorCode {
    /// Returns the error code string (e.g., "CAPACITY_EXCEEDED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
pub const CONSTRUCTION_FAILED: &str = "CONSTRUCTION_FAILED";
pub const INVALID_KEY: &str = "INVALID_KEY";
pub const FACTORY_NOT_REGISTERED: &str = "FACTORY_NOT_REGISTERED";
pub const POOL_ENTRY_NOT_FOUND: &str = "POOL_ENTRY_NOT_FOUND";
pub const CONCURRENCY_ERROR: &str = "CONCURRENCY_ERROR";
pub const SCHEDULER_ERROR: &str = "SCHEDULER_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
