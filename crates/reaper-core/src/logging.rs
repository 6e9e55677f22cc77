//! Tracing subscriber initialisation.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ReaperError;

/// Installs a global `tracing` subscriber built from `config`.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails instead of
/// panicking when a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ReaperError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            ReaperError::configuration(format!("Invalid log level '{}': {e}", config.level))
        })?;

    let result = match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        LogFormat::Compact => fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    result.map_err(|e| ReaperError::configuration(format!("Logging already initialised: {e}")))
}
