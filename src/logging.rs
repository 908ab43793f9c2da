//! Logging initialization and configuration.
//!
//! Logs go to stderr so they never interleave with the per-host report on
//! stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither config nor `RUST_LOG` say otherwise.
pub const DEFAULT_FILTER: &str = "batch_ssh=warn";

/// Turn a configured level into a filter directive.
///
/// A bare level such as `debug` is scoped to this crate. Anything that
/// already looks like a directive (`target=level`, comma lists) is passed
/// through unchanged.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        DEFAULT_FILTER.to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("batch_ssh={}", level)
    }
}

fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(filter_directive(level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    }
}

/// Initialize the logging system with an explicit level.
///
/// # Panics
///
/// Panics if a tracing subscriber has already been set.
pub fn init_with_filter(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(Some(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Try to initialize the logging system from `RUST_LOG`.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(build_filter(None))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
}
