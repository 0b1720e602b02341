use crate::{EgoNetError, LoggingConfig, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| EgoNetError::Config(format!("invalid log level: {}", e)))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format.as_str() {
        "compact" => registry.with(fmt::layer().compact()).try_init(),
        "pretty" => registry.with(fmt::layer().pretty()).try_init(),
        _ => registry.with(fmt::layer()).try_init(),
    };

    installed.map_err(|e| EgoNetError::Config(format!("tracing already initialised: {}", e)))
}
