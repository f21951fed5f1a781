//! Logging setup on the `tracing` ecosystem.
//!
//! Binaries call [`init_subscriber`] once at startup. Library code only
//! emits events; it never installs a subscriber. Tests use
//! [`test_utils::capture_logs`] to assert on swallowed failures.

pub mod test_utils;

pub use test_utils::{CapturedLogs, capture_logs};

/// Level used when neither `RUST_LOG` nor configuration sets one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber writing compact lines to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once
/// is harmless; later calls are ignored.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
