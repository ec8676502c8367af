//! Tracing subscriber setup
//!
//! Log lines go to stderr so `--format json` output on stdout stays
//! machine-readable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither the config file nor `RUST_LOG` sets one
pub const DEFAULT_FILTER: &str = "info,kea_config=debug";

/// Build the filter: explicit directive, then `RUST_LOG`, then [`DEFAULT_FILTER`]
pub fn env_filter(directive: Option<&str>) -> EnvFilter {
    if let Some(directive) = directive {
        if let Ok(filter) = EnvFilter::try_new(directive) {
            return filter;
        }
        eprintln!(
            "Ignoring invalid log filter {:?}, using {}",
            directive, DEFAULT_FILTER
        );
        return EnvFilter::new(DEFAULT_FILTER);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global subscriber
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(directive: Option<&str>) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    // Only fails when a global subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(env_filter(directive))
        .with(fmt_layer)
        .try_init();
}
