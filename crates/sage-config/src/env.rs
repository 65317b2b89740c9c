//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only apply to fields that no
//! config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
    kind: FieldKind,
}

#[derive(Clone, Copy)]
enum FieldKind {
    String,
    Integer,
}

/// All supported `SAGE_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "SAGE_VAULT_ROOT",
        field_path: "vault.root",
        kind: FieldKind::String,
    },
    EnvMapping {
        var_name: "SAGE_APPROVAL_TIMEOUT_MS",
        field_path: "approval.timeout_ms",
        kind: FieldKind::Integer,
    },
    EnvMapping {
        var_name: "SAGE_APPROVAL_POLL_INTERVAL_MS",
        field_path: "approval.poll_interval_ms",
        kind: FieldKind::Integer,
    },
    EnvMapping {
        var_name: "SAGE_LOG_LEVEL",
        field_path: "logging.level",
        kind: FieldKind::String,
    },
    EnvMapping {
        var_name: "SAGE_LOG_FORMAT",
        field_path: "logging.format",
        kind: FieldKind::String,
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] if a numeric variable does not parse.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }
        let Some(raw) = env_vars.get(mapping.var_name) else {
            continue;
        };

        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        let value = coerce(mapping, raw)?;
        set_field(merged, mapping.field_path, value);
        sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
        count = count.saturating_add(1);
    }

    Ok(count)
}

fn coerce(mapping: &EnvMapping, raw: &str) -> ConfigResult<toml::Value> {
    match mapping.kind {
        FieldKind::String => Ok(toml::Value::String(raw.to_owned())),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|e| ConfigError::Env {
                variable: mapping.var_name.to_owned(),
                reason: format!("expected an integer, got '{raw}': {e}"),
            }),
    }
}

/// Insert `value` at a dotted `path`, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment)
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }
    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), value);
    }
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}
