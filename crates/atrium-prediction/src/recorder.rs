//! AccessRecorder: bounded, append-only access log.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use atrium_core::config::PredictionConfig;
use atrium_core::models::{AccessEvent, CacheKey};

#[derive(Debug, Default)]
struct RecorderLog {
    events: VecDeque<AccessEvent>,
    total: u64,
}

/// Ring of recent accesses.
///
/// When the log grows past `capacity` the oldest events are dropped until
/// `retain` remain, so trimming happens in batches rather than per event.
#[derive(Debug)]
pub struct AccessRecorder {
    log: Mutex<RecorderLog>,
    capacity: usize,
    retain: usize,
}

impl AccessRecorder {
    pub fn new(capacity: usize, retain: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            log: Mutex::new(RecorderLog {
                events: VecDeque::with_capacity(capacity + 1),
                total: 0,
            }),
            capacity,
            retain: retain.min(capacity),
        }
    }

    pub fn from_config(config: &PredictionConfig) -> Self {
        Self::new(config.recorder_capacity, config.recorder_retain)
    }

    fn log(&self) -> MutexGuard<'_, RecorderLog> {
        self.log.lock().unwrap_or_else(|e| {
            tracing::warn!("access recorder lock poisoned, recovering");
            e.into_inner()
        })
    }

    /// Append an event, trimming to `retain` once `capacity` is exceeded.
    pub fn record(&self, event: AccessEvent) {
        let mut log = self.log();
        log.events.push_back(event);
        log.total += 1;
        if log.events.len() > self.capacity {
            let excess = log.events.len() - self.retain;
            log.events.drain(..excess);
            tracing::trace!(dropped = excess, "access log trimmed");
        }
    }

    /// The last `n` events, oldest first. Fewer when the log is shorter.
    pub fn recent_window(&self, n: usize) -> Vec<AccessEvent> {
        let log = self.log();
        let skip = log.events.len().saturating_sub(n);
        log.events.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.log().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events ever recorded, including trimmed ones.
    pub fn total_recorded(&self) -> u64 {
        self.log().total
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The `limit` most frequently accessed keys in the current log, with
    /// their counts. Ties resolve by key.
    pub fn key_frequencies(&self, limit: usize) -> Vec<(CacheKey, usize)> {
        let mut counts: HashMap<CacheKey, usize> = HashMap::new();
        for event in self.log().events.iter() {
            *counts.entry(event.key.clone()).or_insert(0) += 1;
        }
        let mut ranked: Vec<(CacheKey, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn clear(&self) {
        self.log().events.clear();
    }
}

impl Default for AccessRecorder {
    fn default() -> Self {
        Self::from_config(&PredictionConfig::default())
    }
}
