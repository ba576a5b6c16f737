//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Initialize the tagguard tracing/logging system.
///
/// Reads the `TAGGUARD_LOG` environment variable for per-module levels,
/// e.g. `TAGGUARD_LOG=tagguard_engine=debug,tagguard_core=warn`.
/// Falls back to the configured `log_level` when it is unset or invalid.
/// Logs go to stderr so report output on stdout stays clean.
///
/// Idempotent; later calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    let json = config.json_logs;
    let fallback = config.log_level.clone();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("TAGGUARD_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
        install(filter, json);
    });
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);
    INIT.call_once(|| install(filter, false));
}

fn install(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .init();
    }
}
