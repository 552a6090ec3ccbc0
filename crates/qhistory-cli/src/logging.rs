use tracing_subscriber::EnvFilter;

use crate::types::LogLevel;

/// Install the global subscriber. `RUST_LOG` wins over `--log-level`.
///
/// Everything goes to stderr: stdout carries command output and, under
/// `mcp serve`, the JSON-RPC stream.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    // Already installed (tests driving `run` twice) is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
