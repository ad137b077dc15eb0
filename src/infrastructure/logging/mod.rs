// Logging module - Logging infrastructure
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging on stderr.
///
/// `RUST_LOG` wins over `log_level`; `verbose` forces debug output.
pub fn init_logging(log_level: &str, verbose: bool) -> Sys8x00Result<()> {
    let default_directive = if verbose {
        "sys8x00=debug".to_string()
    } else {
        format!("sys8x00={}", log_level)
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_directive))
        .map_err(|e| Sys8x00Error::Config {
            message: format!("Invalid log level '{}': {}", log_level, e),
        })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| Sys8x00Error::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("Logging initialized at '{}'", default_directive);
    Ok(())
}
