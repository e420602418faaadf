//! # atrium-pressure
//!
//! Reacts to host memory pressure signals by shedding cache entries and
//! pooled instances. Acts on the current signal only; never errors.
//!
//! | Level | Cache | Pool (available) |
//! |-------|-------|------------------|
//! | normal | none | none |
//! | warning | 25 % | 30 % |
//! | critical | 50 % | 60 % |
//! | urgent | all | all |

pub mod controller;
pub mod policy;
pub mod signals;

pub use controller::{PressureController, PressureReport};
pub use policy::{action_for, ShedAction};
pub use signals::{pressure_channel, PressureSignalReceiver, PressureSignalSender};
