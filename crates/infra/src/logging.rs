//! Tracing subscriber setup.

use docpulse_domain::{DocPulseError, LogFormat, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.level`. Returns `Ok(false)` when a
/// subscriber was already installed, so repeated calls are harmless.
///
/// # Errors
/// Returns `DocPulseError::Config` when the level directive is invalid.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| DocPulseError::Config(format!("invalid log level '{}': {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_current_span(true)).try_init(),
    };

    Ok(installed.is_ok())
}
