//! Victim selection. Pure functions over entry metadata; the store applies
//! the plan under its lock.

use chrono::{DateTime, Duration, Utc};

use atrium_core::constants::EVICTION_BATCH_DIVISOR;
use atrium_core::models::CacheKey;
use atrium_core::traits::EvictionReason;

use crate::entry::{is_expired, CacheEntry};

/// Limits an insertion must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub max_entries: usize,
    pub ceiling_bytes: u64,
}

impl Budget {
    /// Whether `incoming_bytes` can be added to a store holding `count`
    /// entries totalling `bytes`.
    pub fn fits(&self, count: usize, bytes: u64, incoming_bytes: u64) -> bool {
        count < self.max_entries && bytes.saturating_add(incoming_bytes) <= self.ceiling_bytes
    }
}

/// Sort entries least valuable first: oldest access, then fewest accesses,
/// then oldest insertion.
pub fn sort_lru<P>(entries: &mut [&CacheEntry<P>]) {
    entries.sort_by(|a, b| {
        a.last_accessed_at
            .cmp(&b.last_accessed_at)
            .then(a.access_count.cmp(&b.access_count))
            .then(a.sequence.cmp(&b.sequence))
    });
}

/// Choose the entries to drop so that `incoming_bytes` fits in `budget`.
///
/// Phase 1 takes every expired entry. Phase 2 walks the rest in LRU order
/// until the insertion fits, taking at least `max(1, len / 4)` of them.
/// Returns an empty plan when the insertion already fits.
pub fn plan_eviction<'a, P: 'a>(
    entries: impl IntoIterator<Item = &'a CacheEntry<P>>,
    incoming_bytes: u64,
    budget: Budget,
    idle_ttl: Duration,
    now: DateTime<Utc>,
) -> Vec<(CacheKey, EvictionReason)> {
    let entries: Vec<&CacheEntry<P>> = entries.into_iter().collect();
    let mut count = entries.len();
    let mut bytes: u64 = entries.iter().map(|e| e.estimated_memory_bytes).sum();

    if budget.fits(count, bytes, incoming_bytes) {
        return Vec::new();
    }

    let (mut expired, mut rest): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| is_expired(e, idle_ttl, now));

    sort_lru(&mut expired);
    let mut victims: Vec<(CacheKey, EvictionReason)> = Vec::with_capacity(expired.len());
    for e in expired {
        count -= 1;
        bytes = bytes.saturating_sub(e.estimated_memory_bytes);
        victims.push((e.key.clone(), EvictionReason::Expired));
    }

    if budget.fits(count, bytes, incoming_bytes) {
        return victims;
    }

    sort_lru(&mut rest);
    let min_batch = (rest.len() / EVICTION_BATCH_DIVISOR).max(1);
    for (removed, e) in rest.into_iter().enumerate() {
        if removed >= min_batch && budget.fits(count, bytes, incoming_bytes) {
            break;
        }
        let reason = if count >= budget.max_entries {
            EvictionReason::Capacity
        } else {
            EvictionReason::Memory
        };
        count -= 1;
        bytes = bytes.saturating_sub(e.estimated_memory_bytes);
        victims.push((e.key.clone(), reason));
    }

    victims
}

/// Keys of every expired entry, least recently used first.
pub fn expired_keys<'a, P: 'a>(
    entries: impl IntoIterator<Item = &'a CacheEntry<P>>,
    idle_ttl: Duration,
    now: DateTime<Utc>,
) -> Vec<CacheKey> {
    let mut expired: Vec<&CacheEntry<P>> = entries
        .into_iter()
        .filter(|e| is_expired(e, idle_ttl, now))
        .collect();
    sort_lru(&mut expired);
    expired.into_iter().map(|e| e.key.clone()).collect()
}

/// The `count` least recently used keys.
pub fn lru_keys<'a, P: 'a>(
    entries: impl IntoIterator<Item = &'a CacheEntry<P>>,
    count: usize,
) -> Vec<CacheKey> {
    let mut all: Vec<&CacheEntry<P>> = entries.into_iter().collect();
    sort_lru(&mut all);
    all.into_iter().take(count).map(|e| e.key.clone()).collect()
}
