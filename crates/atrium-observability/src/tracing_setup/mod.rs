//! Tracing initialization and configuration.

pub mod events;
pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use atrium_core::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Environment variable holding per-target filter directives.
pub const LOG_ENV: &str = "ATRIUM_LOG";

/// Crate targets covered by the fallback filter.
const TARGETS: &[&str] = &[
    "atrium_core",
    "atrium_store",
    "atrium_pool",
    "atrium_prediction",
    "atrium_pressure",
    "atrium_observability",
    "atrium_navigation",
];

fn default_directives(level: &str) -> String {
    TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing with the default configuration.
///
/// Reads `ATRIUM_LOG` for filter directives, e.g.
/// `ATRIUM_LOG=atrium_store=debug,atrium_navigation=info`.
/// Falls back to `info` for every atrium crate if unset or invalid.
pub fn init_tracing() {
    init_tracing_with(&ObservabilityConfig::default());
}

/// Initialize tracing. `ATRIUM_LOG` wins over `config.log_level`.
///
/// Idempotent. If the host already installed a global subscriber this is a
/// no-op.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    let level = config.log_level.clone();
    let json = config.json_logs;
    INIT.call_once(move || {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directives(&level)));

        let json_layer = json.then(|| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
        });
        let text_layer = (!json).then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
        });

        let _ = tracing_subscriber::registry()
            .with(json_layer)
            .with(text_layer)
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_filter_names_every_crate() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("atrium_core=debug,"));
        assert!(directives.contains("atrium_navigation=debug"));
        assert_eq!(directives.split(',').count(), TARGETS.len());
    }
}
