//! Structured logging setup.
//!
//! Logs go to stderr so stdout stays clean for port lists and JSON.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `portcheck_core=trace`).
pub const LOG_ENV: &str = "PORT_CHECK_LOG";

/// Install the global subscriber.
///
/// Filter precedence: `PORT_CHECK_LOG`, then `RUST_LOG`, then `debug` with
/// `--verbose` or `error` without.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
