//! Predictor: the current transition table plus memoised queries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use atrium_core::models::{AccessEvent, CacheKey};

use crate::cache::PredictionCache;
use crate::transitions::{Prediction, TransitionTable};

/// Frequency-based next-panel predictor.
///
/// `learn` swaps in a freshly built table; `predict` reads whichever table
/// is current. Both may be called from any thread.
#[derive(Debug)]
pub struct Predictor {
    table: RwLock<Arc<TransitionTable>>,
    version: AtomicU64,
    cache: PredictionCache,
}

impl Predictor {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Arc::new(TransitionTable::new())),
            version: AtomicU64::new(0),
            cache: PredictionCache::new(),
        }
    }

    /// Rebuild the transition table from `window` (oldest first).
    pub fn learn(&self, window: &[AccessEvent]) {
        let table = Arc::new(TransitionTable::from_window(window));
        let pairs = table.pair_count();
        {
            let mut current = self.table.write().unwrap_or_else(|e| e.into_inner());
            *current = table;
            self.version.fetch_add(1, Ordering::SeqCst);
        }
        self.cache.invalidate_all();
        tracing::trace!(pairs, "transition table rebuilt");
    }

    /// Snapshot of the current table and its version.
    fn current(&self) -> (Arc<TransitionTable>, u64) {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        (Arc::clone(&table), self.version.load(Ordering::SeqCst))
    }

    pub fn table(&self) -> Arc<TransitionTable> {
        self.current().0
    }

    /// Times the table has been rebuilt.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Up to `top_n` likely successors of `from` with confidence at least
    /// `min_confidence`. Empty when `from` has never been followed.
    pub fn predict(&self, from: &CacheKey, top_n: usize, min_confidence: f64) -> Vec<Prediction> {
        if top_n == 0 {
            return Vec::new();
        }
        let (table, version) = self.current();
        let query = PredictionCache::query_key(from, top_n, min_confidence, version);
        if let Some(hit) = self.cache.get(&query) {
            return hit;
        }
        let predictions = table.predict(from, top_n, min_confidence);
        self.cache.insert(query, predictions.clone());
        predictions
    }

    pub fn cache(&self) -> &PredictionCache {
        &self.cache
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new()
    }
}
