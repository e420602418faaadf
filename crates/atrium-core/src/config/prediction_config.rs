use serde::{Deserialize, Serialize};

use super::defaults;

/// Access recording and next-panel prediction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Maximum candidates prefetched after a navigation.
    pub top_n: usize,
    /// Minimum confidence for automatic prefetch.
    pub min_confidence: f64,
    /// Minimum confidence for the diagnostics view.
    pub diagnostic_min_confidence: f64,
    /// Number of recent events the predictor learns from.
    pub window_size: usize,
    /// Access log capacity before a trim.
    pub recorder_capacity: usize,
    /// Events kept after a trim.
    pub recorder_retain: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::DEFAULT_PREDICTION_TOP_N,
            min_confidence: defaults::DEFAULT_PREFETCH_MIN_CONFIDENCE,
            diagnostic_min_confidence: defaults::DEFAULT_DIAGNOSTIC_MIN_CONFIDENCE,
            window_size: defaults::DEFAULT_PREDICTION_WINDOW,
            recorder_capacity: defaults::DEFAULT_RECORDER_CAPACITY,
            recorder_retain: defaults::DEFAULT_RECORDER_RETAIN,
        }
    }
}
