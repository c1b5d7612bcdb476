use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::config::Verbosity;

/// Diagnostics go to stderr so stdout carries only the chart. `RUST_LOG`
/// overrides the level picked from `verbosity`.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
