use crate::models::CacheKey;

/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionReason {
    /// Entry count over capacity.
    Capacity,
    /// Memory over ceiling.
    Memory,
    /// Idle beyond TTL.
    Expired,
    /// Shed under memory pressure.
    Pressure,
    /// `remove` called.
    Explicit,
    /// `clear` called.
    Cleared,
    /// Overwritten by a `put` on the same key.
    Replaced,
}

/// Observer for cache store lifecycle events.
///
/// Default no-op methods so handlers override only what they care about.
/// Handlers run synchronously after the store lock is released.
pub trait IStoreEventHandler: Send + Sync {
    fn on_inserted(&self, _key: &CacheKey, _bytes: u64, _speculative: bool) {}

    fn on_evicted(&self, _key: &CacheKey, _bytes: u64, _reason: EvictionReason) {}
}
