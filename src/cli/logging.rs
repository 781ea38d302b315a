//! Diagnostic logging setup

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,notify_cli=debug"
    } else {
        "warn"
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
