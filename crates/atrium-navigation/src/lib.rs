//! # atrium-navigation
//!
//! The facade hosts call. `navigate` serves a panel from the cache or
//! builds it on the caller's thread, records the access, then hands
//! prediction and speculative construction to a background runtime.
//!
//! ```text
//! Requested ─┬─ CacheHit ───────────────────┐
//!            └─ CacheMiss ─ Constructing ───┴─ Delivered ─ [async] PredictPrefetch
//! ```
//!
//! [`AtriumRuntime`] wires every component from an [`AtriumConfig`] and owns
//! the background work: prefetch, periodic cleanup, and the pressure
//! signal listener.
//!
//! [`AtriumConfig`]: atrium_core::AtriumConfig

pub mod cleanup;
pub mod controller;
pub mod registry;
pub mod runtime;
pub mod scheduler;

pub use cleanup::{CleanupReport, CleanupTask};
pub use controller::NavigationController;
pub use registry::{FactoryRegistry, PanelMeta, Registration};
pub use runtime::AtriumRuntime;
pub use scheduler::{PrefetchOutcome, PrefetchScheduler};
