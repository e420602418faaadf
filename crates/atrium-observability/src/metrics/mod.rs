//! Lock-free counters feeding the statistics snapshot.

pub mod eviction_metrics;
pub mod prefetch_metrics;

pub use eviction_metrics::EvictionMetrics;
pub use prefetch_metrics::PrefetchMetrics;
