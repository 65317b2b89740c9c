//! Sage telemetry: logging setup on top of `tracing-subscriber`.
//!
//! # Example
//!
//! ```rust,no_run
//! use sage_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), sage_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("sage_approval=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
