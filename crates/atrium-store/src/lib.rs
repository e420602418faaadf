//! # atrium-store
//!
//! Keyed cache of constructed panels.
//!
//! ## Eviction
//!
//! Runs before an insertion would exceed the entry capacity or the memory
//! ceiling, in two phases:
//!
//! 1. Drop every entry idle longer than the TTL.
//! 2. If still over budget, drop least-recently-used entries (ties: fewer
//!    accesses first, then older insertion), at least `max(1, len / 4)` per
//!    sweep.
//!
//! Memory never exceeds `ceiling × slack` once an operation returns.

pub mod entry;
pub mod events;
pub mod eviction;
pub mod store;

pub use entry::{is_expired, CacheEntry, EntryInfo};
pub use events::StoreEventDispatcher;
pub use store::{CacheStore, Lookup, PutOutcome, SpeculativeOutcome};
