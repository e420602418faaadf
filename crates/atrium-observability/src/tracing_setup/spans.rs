//! Span definitions per operation: navigate, prefetch, eviction, pressure.

/// Create a navigation span.
#[macro_export]
macro_rules! navigate_span {
    ($key:expr, $context:expr) => {
        tracing::info_span!("atrium.navigate", key = %$key, context = %$context)
    };
}

/// Create a background prefetch span.
#[macro_export]
macro_rules! prefetch_span {
    ($key:expr, $generation:expr) => {
        tracing::debug_span!("atrium.prefetch", key = %$key, generation = $generation)
    };
}

/// Create an eviction sweep span.
#[macro_export]
macro_rules! eviction_span {
    ($component:expr) => {
        tracing::debug_span!("atrium.eviction", component = %$component)
    };
}

/// Create a pressure handling span.
#[macro_export]
macro_rules! pressure_span {
    ($level:expr) => {
        tracing::info_span!("atrium.pressure", level = %$level)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const NAVIGATE: &str = "atrium.navigate";
    pub const PREFETCH: &str = "atrium.prefetch";
    pub const EVICTION: &str = "atrium.eviction";
    pub const PRESSURE: &str = "atrium.pressure";
}
