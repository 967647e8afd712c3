//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use vsme_domain::{LoggingConfig, Result, VsmeError};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Fails when a
/// subscriber is already installed or the level does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            VsmeError::Config(format!("Invalid log level '{}': {e}", config.level))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| VsmeError::Internal(format!("tracing already initialised: {e}")))
}
