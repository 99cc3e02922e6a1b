//! Tracing/logging initialization.
//!
//! JSON lines on stdout, filtered through `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter from a raw `RUST_LOG` value.
pub fn env_filter(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call multiple times.
pub fn init() {
    let raw = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(raw.as_deref()))
        .json()
        .with_current_span(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
