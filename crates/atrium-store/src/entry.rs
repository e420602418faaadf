use chrono::{DateTime, Duration, Utc};

use atrium_core::models::CacheKey;

/// A cached panel and its bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry<P> {
    pub key: CacheKey,
    pub payload: P,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    /// Starts at 1 on construction; +1 per successful lookup.
    pub access_count: u64,
    pub estimated_memory_bytes: u64,
    pub type_tag: String,
    /// Inserted by prefetch and not yet requested for real.
    pub speculative: bool,
    /// Insertion order, last resort tie-break for eviction.
    pub(crate) sequence: u64,
}

impl<P> CacheEntry<P> {
    pub(crate) fn new(
        key: CacheKey,
        payload: P,
        estimated_memory_bytes: u64,
        type_tag: &str,
        now: DateTime<Utc>,
        sequence: u64,
    ) -> Self {
        Self {
            key,
            payload,
            created_at: now,
            last_accessed_at: now,
            access_count: 1,
            estimated_memory_bytes,
            type_tag: type_tag.to_string(),
            speculative: false,
            sequence,
        }
    }

    /// Record a successful lookup. Timestamps never move backwards.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_accessed_at {
            self.last_accessed_at = now;
        }
        self.access_count += 1;
        self.speculative = false;
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            key: self.key.clone(),
            created_at: self.created_at,
            last_accessed_at: self.last_accessed_at,
            access_count: self.access_count,
            estimated_memory_bytes: self.estimated_memory_bytes,
            type_tag: self.type_tag.clone(),
            speculative: self.speculative,
        }
    }
}

/// Payload-free view of an entry's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    pub key: CacheKey,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    pub estimated_memory_bytes: u64,
    pub type_tag: String,
    pub speculative: bool,
}

/// True when the entry has been idle for longer than `idle_ttl`.
pub fn is_expired<P>(entry: &CacheEntry<P>, idle_ttl: Duration, now: DateTime<Utc>) -> bool {
    now - entry.last_accessed_at > idle_ttl
}
