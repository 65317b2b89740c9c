#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Layered configuration for Sage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sage_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("approval timeout: {:?}", resolved.config.approval.timeout());
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **File** passed explicitly (`--config <path>`)
//! 2. **User** (`~/.sage/config.toml`)
//! 3. **Environment variables** (`SAGE_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! This crate has no dependencies on other internal sage crates. Conversion
//! into domain types happens in the CLI.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered merging with source tracking.
pub mod merge;
/// Resolved configuration display.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use merge::{ConfigLayer, FieldSources};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, None)
    }

    /// Load configuration with `sage_home` in place of `~/.sage`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        sage_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, Some(sage_home))
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
