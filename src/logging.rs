//! Tracing initialization.
//!
//! `RUST_LOG` wins when set; otherwise the crate logs at info, or debug with
//! `--verbose`. Logs go to stderr so stdout stays free for the result line.

use tracing_subscriber::{EnvFilter, prelude::*};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "relocpkg=debug"
    } else {
        "relocpkg=info"
    }
}

/// Initialize tracing. Call once at process startup.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
}
