//! Logging initialization.
//!
//! Diagnostic events go to stderr through `tracing`, filtered by the
//! standard `RUST_LOG` variable (default `warn`). User-facing progress
//! stays on stdout; this channel is for debugging command execution and
//! teardown problems without polluting the sync log.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
