use std::sync::Arc;

/// Error type a panel factory may return.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Result of invoking a panel factory.
pub type FactoryResult<P> = Result<P, FactoryError>;

/// Shareable factory that may be called any number of times, from any thread.
///
/// Construction must be safe to repeat: a racing prefetch and real navigation
/// may both build the same panel.
pub type SharedFactory<P> = Arc<dyn Fn() -> FactoryResult<P> + Send + Sync>;
