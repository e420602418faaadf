//! Traits and callback types wiring the components together.

pub mod clock;
pub mod factory;
pub mod shed_target;
pub mod store_events;

pub use clock::{IClock, ManualClock, SystemClock};
pub use factory::{FactoryError, FactoryResult, SharedFactory};
pub use shed_target::{shed_count, IShedTarget};
pub use store_events::{EvictionReason, IStoreEventHandler};
