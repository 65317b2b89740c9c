//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.sage/config.toml` (user)
//! 3. Merge the explicitly requested file, if any
//! 4. Apply `SAGE_*` env var fallbacks for fields no file set
//! 5. Deserialize merged tree → `Config`
//! 6. Validate
//! 7. Return `ResolvedConfig`

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load the configuration with layered file precedence.
///
/// `explicit` is a config file named on the command line; unlike the user
/// file it must exist. `sage_home_override` replaces `~/.sage` as the
/// directory searched for the user config.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, an env var
/// does not parse, or the final merged configuration fails validation.
pub fn load(
    explicit: Option<&Path>,
    sage_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    load_with_env(explicit, sage_home_override, &collect_env_vars())
}

pub(crate) fn load_with_env(
    explicit: Option<&Path>,
    sage_home_override: Option<&Path>,
    env_vars: &std::collections::HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<embedded defaults>"),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", ConfigLayer::Defaults, &mut field_sources);

    let sage_home = match sage_home_override {
        Some(dir) => dir.to_path_buf(),
        None => home_directory()?.join(".sage"),
    };
    let user_path = sage_home.join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(&mut merged, &overlay, "", ConfigLayer::User, &mut field_sources);
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    if let Some(path) = explicit {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        deep_merge_tracking(&mut merged, &overlay, "", ConfigLayer::File, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded config file");
    }

    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars)?;
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                path: PathBuf::from("<merged config>"),
                source: e,
            })?;

    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let value = try_load_file(path)?.ok_or_else(|| ConfigError::Read {
        path: path.to_path_buf(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;
    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// The size check happens after the single read so there is no window
/// between stat and read.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid {
            key: path.display().to_string(),
            reason: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_defaults_deserialize_to_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_defaults_only() {
        let home = tempfile::tempdir().unwrap();
        let resolved = load_with_env(None, Some(home.path()), &no_env()).unwrap();
        assert_eq!(resolved.config, Config::default());
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(
            resolved.field_sources.get("approval.timeout_ms"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_user_then_file_precedence() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[approval]\ntimeout_ms = 30000\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let explicit = home.path().join("session.toml");
        std::fs::write(&explicit, "[approval]\ntimeout_ms = 1000\n").unwrap();

        let resolved = load_with_env(Some(&explicit), Some(home.path()), &no_env()).unwrap();

        assert_eq!(resolved.config.approval.timeout_ms, 1000);
        assert_eq!(resolved.config.approval.poll_interval_ms, 500);
        assert_eq!(resolved.config.logging.level, "debug");
        assert_eq!(resolved.loaded_files.len(), 2);
        assert_eq!(
            resolved.field_sources.get("approval.timeout_ms"),
            Some(&ConfigLayer::File)
        );
        assert_eq!(
            resolved.field_sources.get("logging.level"),
            Some(&ConfigLayer::User)
        );
    }

    #[test]
    fn test_env_only_fills_unset_fields() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("config.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();
        let env: HashMap<String, String> = [
            ("SAGE_LOG_LEVEL", "trace"),
            ("SAGE_VAULT_ROOT", "/srv/notes"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let resolved = load_with_env(None, Some(home.path()), &env).unwrap();

        assert_eq!(resolved.config.logging.level, "warn");
        assert_eq!(resolved.config.vault.root.as_deref(), Some("/srv/notes"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let home = tempfile::tempdir().unwrap();
        let missing = home.path().join("nope.toml");
        let err = load_with_env(Some(&missing), Some(home.path()), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_merged_config_fails_validation() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[approval]\npoll_interval_ms = 0\n",
        )
        .unwrap();
        let err = load_with_env(None, Some(home.path()), &no_env()).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { ref key, .. } if key == "approval.poll_interval_ms")
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[approval\ntimeout_ms = ").unwrap();
        assert!(matches!(
            load_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_try_load_file_missing() {
        let result = try_load_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }
}
