//! # atrium-core
//!
//! Foundation crate for the Atrium panel cache.
//! Defines keys, access events, pressure levels, statistics models,
//! configuration, errors, constants, and the traits every other crate
//! in the workspace is wired through.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AtriumConfig;
pub use errors::{AtriumError, AtriumResult};
pub use models::{AccessContext, AccessEvent, CacheKey, PressureLevel};
pub use traits::{FactoryResult, IClock, ManualClock, SystemClock};
