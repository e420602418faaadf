//! First-order transition table built from consecutive access pairs.

use std::collections::HashMap;

use serde::Serialize;

use atrium_core::models::{AccessEvent, CacheKey};

/// Count and recency of one `from → to` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionStat {
    pub count: u64,
    /// Index of the most recent pair in the learning window.
    pub last_seen: usize,
}

/// A ranked next-panel candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub key: CacheKey,
    /// `count / Σ count(from → *)`, in (0, 1].
    pub confidence: f64,
    pub count: u64,
}

#[derive(Debug, Default, Clone)]
struct Outgoing {
    targets: HashMap<CacheKey, TransitionStat>,
    total: u64,
}

/// `from → to → count` over a window of accesses.
#[derive(Debug, Default, Clone)]
pub struct TransitionTable {
    sources: HashMap<CacheKey, Outgoing>,
    pairs: usize,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a window of events, oldest first.
    pub fn from_window(window: &[AccessEvent]) -> Self {
        Self::from_keys(window.iter().map(|e| &e.key))
    }

    /// Build from a key sequence, oldest first.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a CacheKey>) -> Self {
        let mut table = Self::new();
        let mut prev: Option<&CacheKey> = None;
        for key in keys {
            if let Some(from) = prev {
                table.observe(from, key);
            }
            prev = Some(key);
        }
        table
    }

    fn observe(&mut self, from: &CacheKey, to: &CacheKey) {
        let position = self.pairs;
        self.pairs += 1;
        let outgoing = self.sources.entry(from.clone()).or_default();
        outgoing.total += 1;
        let stat = outgoing
            .targets
            .entry(to.clone())
            .or_insert(TransitionStat {
                count: 0,
                last_seen: position,
            });
        stat.count += 1;
        stat.last_seen = position;
    }

    /// Number of consecutive pairs the table was built from.
    pub fn pair_count(&self) -> usize {
        self.pairs
    }

    /// Number of distinct `from` keys.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    pub fn stat(&self, from: &CacheKey, to: &CacheKey) -> Option<TransitionStat> {
        self.sources.get(from)?.targets.get(to).copied()
    }

    /// Confidence of `from → to`, 0.0 when never observed.
    pub fn confidence(&self, from: &CacheKey, to: &CacheKey) -> f64 {
        match self.sources.get(from) {
            Some(out) if out.total > 0 => out
                .targets
                .get(to)
                .map(|s| s.count as f64 / out.total as f64)
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Every successor of `from`, ranked. Empty for an unknown key.
    pub fn ranked(&self, from: &CacheKey) -> Vec<Prediction> {
        let Some(out) = self.sources.get(from) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&CacheKey, &TransitionStat)> = out.targets.iter().collect();
        // All candidates share `from`, so ordering by count orders by confidence.
        ranked.sort_by(|(ka, a), (kb, b)| {
            b.count
                .cmp(&a.count)
                .then(b.last_seen.cmp(&a.last_seen))
                .then_with(|| ka.cmp(kb))
        });
        ranked
            .into_iter()
            .map(|(key, stat)| Prediction {
                key: key.clone(),
                confidence: stat.count as f64 / out.total as f64,
                count: stat.count,
            })
            .collect()
    }

    /// Up to `top_n` successors of `from` with confidence at least
    /// `min_confidence`, ranked.
    pub fn predict(&self, from: &CacheKey, top_n: usize, min_confidence: f64) -> Vec<Prediction> {
        self.ranked(from)
            .into_iter()
            .filter(|p| p.confidence >= min_confidence)
            .take(top_n)
            .collect()
    }
}
