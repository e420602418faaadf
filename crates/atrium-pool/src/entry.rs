//! PoolEntry and Lease.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A tracked pooled instance.
#[derive(Debug, Clone)]
pub struct PoolEntry<P> {
    pub id: Uuid,
    pub type_tag: String,
    pub payload: P,
    /// Creation time until the first release.
    pub last_returned_at: DateTime<Utc>,
    /// Times this instance was released back for reuse.
    pub reuse_count: u64,
}

impl<P> PoolEntry<P> {
    pub fn new(type_tag: &str, payload: P, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_tag: type_tag.to_string(),
            payload,
            last_returned_at: now,
            reuse_count: 0,
        }
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.last_returned_at
    }
}

/// An instance handed out by `ObjectPool::acquire`.
#[derive(Debug, Clone)]
pub struct Lease<P> {
    /// `None` when the pool was at capacity and the instance is not tracked.
    /// Untracked instances need no release.
    pub id: Option<Uuid>,
    pub type_tag: String,
    pub payload: P,
    /// Served from the available set rather than a fresh construction.
    pub reused: bool,
}

impl<P> Lease<P> {
    pub fn is_tracked(&self) -> bool {
        self.id.is_some()
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}
