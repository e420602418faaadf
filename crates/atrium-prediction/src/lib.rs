//! # atrium-prediction
//!
//! Learns which panel tends to follow which from the recent access log and
//! predicts the next ones to prefetch.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`AccessRecorder`] | Bounded ring of [`AccessEvent`](atrium_core::AccessEvent)s |
//! | [`TransitionTable`] | `from → to → count` over consecutive pairs |
//! | [`Predictor`] | Holds the current table, ranks candidates |
//! | [`PredictionCache`] | Memoises ranked results per table version |
//!
//! Ranking: confidence descending, then the most recently seen transition,
//! then key ascending. Results are deterministic for a given window.

pub mod cache;
pub mod predictor;
pub mod recorder;
pub mod transitions;

pub use cache::PredictionCache;
pub use predictor::Predictor;
pub use recorder::AccessRecorder;
pub use transitions::{Prediction, TransitionStat, TransitionTable};
