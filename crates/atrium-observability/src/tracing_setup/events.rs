//! Structured log events for key operations.

use atrium_core::models::{CacheKey, PressureLevel};

/// A panel was built on the foreground path.
pub fn panel_constructed(key: &CacheKey, bytes: u64) {
    tracing::debug!(event = "panel_constructed", key = %key, bytes, "panel constructed");
}

/// A panel could not be cached because it exceeds the memory ceiling.
pub fn panel_not_cached(key: &CacheKey, bytes: u64, ceiling: u64) {
    tracing::warn!(
        event = "panel_not_cached",
        key = %key,
        bytes,
        ceiling,
        "panel exceeds memory ceiling, served uncached"
    );
}

/// A prefetched panel landed in the cache.
pub fn prefetch_stored(key: &CacheKey, confidence: f64) {
    tracing::debug!(event = "prefetch_stored", key = %key, confidence, "prefetch stored");
}

/// A prefetch result was thrown away.
pub fn prefetch_discarded(key: &CacheKey, reason: &str) {
    tracing::debug!(event = "prefetch_discarded", key = %key, reason, "prefetch discarded");
}

/// A prefetch factory failed. Never surfaces to callers.
pub fn prefetch_failed(key: &CacheKey, error: &str) {
    tracing::warn!(event = "prefetch_failed", key = %key, error, "prefetch failed");
}

/// A pressure signal was handled.
pub fn pressure_handled(level: PressureLevel, cache_evicted: usize, pool_evicted: usize) {
    tracing::info!(
        event = "pressure_handled",
        level = %level,
        cache_evicted,
        pool_evicted,
        "memory pressure handled"
    );
}

/// Periodic cleanup finished.
pub fn cleanup_completed(cache_expired: usize, pool_dropped: usize) {
    tracing::debug!(
        event = "cleanup_completed",
        cache_expired,
        pool_dropped,
        "periodic cleanup completed"
    );
}
