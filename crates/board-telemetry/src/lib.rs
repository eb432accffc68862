//! # Board Telemetry
//!
//! Structured logging for the board shell: an `EnvFilter`-driven
//! `tracing-subscriber` registry with console or JSON output.
//!
//! Initialize once at process start; a second call reports an error
//! instead of panicking so embedders with their own subscriber can
//! ignore it.

#![warn(missing_docs)]

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;

pub use config::TelemetryConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Telemetry setup failed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log level filter did not parse.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("Telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        registry
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else if config.console_output {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else {
        registry
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        "Telemetry initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_errors_instead_of_panicking() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        let first = init_telemetry(&config);
        let second = init_telemetry(&config);
        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
