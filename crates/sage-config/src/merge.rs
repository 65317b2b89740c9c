//! Layered merging of raw TOML trees with per-field source tracking.

use std::collections::HashMap;
use std::fmt;

/// Which configuration layer set a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigLayer {
    /// Embedded `defaults.toml`.
    Defaults,
    /// `~/.sage/config.toml`.
    User,
    /// A file passed explicitly on the command line.
    File,
    /// A `SAGE_*` environment variable.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Defaults => "defaults",
            Self::User => "user",
            Self::File => "file",
            Self::Environment => "env",
        })
    }
}

/// Dotted field path to the layer that last set it.
pub type FieldSources = HashMap<String, ConfigLayer>;

/// Merge `overlay` into `base`, recording `layer` for every leaf it sets.
///
/// Tables merge recursively; any other value (arrays included) replaces the
/// base value wholesale.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    if !(base.is_table() && overlay.is_table()) {
        *base = overlay.clone();
        sources.insert(prefix.to_owned(), layer);
        return;
    }
    let (Some(base_table), Some(overlay_table)) = (base.as_table_mut(), overlay.as_table()) else {
        return;
    };

    for (key, value) in overlay_table {
        let path = join(prefix, key);
        let nested = value.is_table() && base_table.get(key).is_some_and(toml::Value::is_table);
        if nested {
            if let Some(existing) = base_table.get_mut(key) {
                deep_merge_tracking(existing, value, &path, layer, sources);
            }
        } else {
            base_table.insert(key.clone(), value.clone());
            record_leaves(value, &path, layer, sources);
        }
    }
}

/// Mark every leaf under `value` as set by `layer`.
pub fn record_leaves(
    value: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    if let toml::Value::Table(table) = value {
        for (key, child) in table {
            record_leaves(child, &join(prefix, key), layer, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), layer);
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_overlay_replaces_leaves_and_keeps_siblings() {
        let mut base = parse("[approval]\ntimeout_ms = 100\npoll_interval_ms = 10");
        let overlay = parse("[approval]\ntimeout_ms = 200");
        let mut sources = FieldSources::new();

        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::User, &mut sources);

        assert_eq!(base["approval"]["timeout_ms"].as_integer(), Some(200));
        assert_eq!(base["approval"]["poll_interval_ms"].as_integer(), Some(10));
        assert_eq!(sources.get("approval.timeout_ms"), Some(&ConfigLayer::User));
        assert!(!sources.contains_key("approval.poll_interval_ms"));
    }

    #[test]
    fn test_new_table_is_recorded_per_leaf() {
        let mut base = parse("[logging]\nlevel = \"info\"");
        let overlay = parse("[vault]\nroot = \"/notes\"");
        let mut sources = FieldSources::new();

        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::File, &mut sources);

        assert_eq!(base["vault"]["root"].as_str(), Some("/notes"));
        assert_eq!(sources.get("vault.root"), Some(&ConfigLayer::File));
    }

    #[test]
    fn test_arrays_replace() {
        let mut base = parse("[logging]\ndirectives = [\"a=debug\", \"b=info\"]");
        let overlay = parse("[logging]\ndirectives = [\"c=trace\"]");
        let mut sources = FieldSources::new();

        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::User, &mut sources);

        let directives = base["logging"]["directives"].as_array().unwrap();
        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn test_layer_display() {
        assert_eq!(ConfigLayer::Environment.to_string(), "env");
        assert_eq!(ConfigLayer::Defaults.to_string(), "defaults");
    }
}
