//! Telemetry errors.

use thiserror::Error;

/// Errors raised while configuring logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or a directive did not parse.
    #[error("invalid logging configuration: {0}")]
    ConfigError(String),

    /// A global subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    InitError(String),
}

/// Result alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
