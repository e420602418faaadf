//! Error handling for Atrium.
//! One error enum per concern, `thiserror` only.

pub mod atrium_error;
pub mod config_error;
pub mod error_code;

pub use atrium_error::AtriumError;
pub use config_error::ConfigError;
pub use error_code::AtriumErrorCode;

/// Convenience alias used across the workspace.
pub type AtriumResult<T> = Result<T, AtriumError>;
