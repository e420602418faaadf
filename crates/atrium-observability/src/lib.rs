//! # atrium-observability
//!
//! Structured tracing setup with span definitions and event helpers, plus
//! the lock-free counters behind the prefetch and eviction statistics.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{EvictionMetrics, PrefetchMetrics};
pub use tracing_setup::{init_tracing, init_tracing_with};
