//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so the TUI's stdout screen is never corrupted.
//! User-facing messages stay in the UI; operator detail (transport failures,
//! malformed responses) flows through `tracing`.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialize the global subscriber once at startup.
///
/// `RUST_LOG` wins when set; otherwise the configured filter applies.
pub fn init(filter: &str) -> Result<(), AppError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| AppError::usage(format!("Invalid log filter '{filter}': {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::runtime(format!("Failed to initialize logging: {e}")))
}
