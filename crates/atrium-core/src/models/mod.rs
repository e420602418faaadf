//! Data types shared across the workspace.

pub mod access_event;
pub mod cache_key;
pub mod pressure_level;
pub mod statistics;

pub use access_event::{AccessContext, AccessEvent};
pub use cache_key::CacheKey;
pub use pressure_level::PressureLevel;
pub use statistics::{CacheStatistics, PoolStatistics, PrefetchStatistics, StatisticsSnapshot};
