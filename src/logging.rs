//! Log output setup
//!
//! Logs go to stderr so command output on stdout stays pipeable.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a log filter (e.g. `partcost=debug`)
pub const LOG_ENV: &str = "PARTCOST_LOG";

/// Initialize logging
///
/// `PARTCOST_LOG` wins when set; otherwise `--verbose` selects debug and
/// `level` (from configuration) or `warn` is used.
pub fn init(verbose: bool, level: Option<&str>) {
    let fallback = if verbose {
        "debug"
    } else {
        level.unwrap_or("warn")
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed (tests, embedding callers)
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Logging for tests, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
