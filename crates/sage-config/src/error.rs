use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why Sage could not produce a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file exists but could not be opened or read.
    #[error("cannot read settings from {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// What the filesystem reported.
        #[source]
        source: io::Error,
    },

    /// A settings file is not valid TOML for the Sage schema.
    #[error("settings in {} are malformed: {source}", path.display())]
    Parse {
        /// File, or pseudo-path of an in-memory layer, being parsed.
        path: PathBuf,
        /// Where and why TOML decoding stopped.
        #[source]
        source: toml::de::Error,
    },

    /// The merged settings hold a value Sage cannot run with.
    #[error("setting `{key}` is invalid: {reason}")]
    Invalid {
        /// Dotted key of the offending setting.
        key: String,
        /// What is wrong with its value.
        reason: String,
    },

    /// A `SAGE_*` override could not be applied.
    #[error("override {variable} is unusable: {reason}")]
    Env {
        /// The environment variable name.
        variable: String,
        /// Why its value was refused.
        reason: String,
    },

    /// No home directory to look for the user settings file in.
    #[error("no home directory found; pass a settings file explicitly")]
    NoHome,
}

/// Result alias used across the config crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
