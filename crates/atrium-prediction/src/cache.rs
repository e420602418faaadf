//! Prediction cache keyed by query and table version.
//!
//! Uses `moka::sync::Cache` with a short TTL. Entries carry the table
//! version in their key, so a stale table can never serve a hit; `learn`
//! still invalidates everything to release memory early. Tracks hits/misses.

use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use atrium_core::models::CacheKey;

use crate::transitions::Prediction;

/// Lifetime of a memoised result.
const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Maximum memoised queries.
const MAX_ENTRIES: u64 = 512;

/// Memoised `predict` results with hit/miss tracking.
pub struct PredictionCache {
    cache: Cache<String, Vec<Prediction>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PredictionCache {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(DEFAULT_TTL)
            .build();
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache key for one `predict` call against table `version`.
    pub fn query_key(from: &CacheKey, top_n: usize, min_confidence: f64, version: u64) -> String {
        format!("{version}:{top_n}:{:016x}:{from}", min_confidence.to_bits())
    }

    pub fn get(&self, key: &str) -> Option<Vec<Prediction>> {
        let found = self.cache.get(key);
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: String, predictions: Vec<Prediction>) {
        self.cache.insert(key, predictions);
    }

    /// Invalidate all entries (after the table is rebuilt).
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cache hit rate (0.0–1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Approximate; moka applies writes lazily.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for PredictionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PredictionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionCache")
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
