//! Source-annotated display for `config show`.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path → which layer set the value.
    pub field_sources: FieldSources,
    /// Config file paths that were loaded (in precedence order).
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments showing source.
    Toml,
    /// JSON (for programmatic consumption).
    Json,
}

impl ResolvedConfig {
    /// Render the resolved config, optionally limited to one section.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or `section` does not exist.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(section),
            ShowFormat::Json => self.show_json(section),
        }
    }

    fn section_value(&self, section: Option<&str>) -> Result<toml::Value, fmt::Error> {
        let value = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        match section {
            Some(name) => value.get(name).cloned().ok_or(fmt::Error),
            None => Ok(value),
        }
    }

    fn show_toml(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        let body = toml::to_string_pretty(&self.section_value(section)?).map_err(|_| fmt::Error)?;

        let mut output = String::new();
        output.push_str("# Resolved Sage configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [file] [env]\n");
        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }
        output.push('\n');

        let mut table = section.unwrap_or("").to_owned();
        for line in body.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                table = match section {
                    Some(s) => format!("{s}.{header}"),
                    None => header.to_owned(),
                };
            }
            match self.annotate_line(trimmed, &table) {
                Some(layer) => writeln!(output, "{line}  # [{layer}]")?,
                None => writeln!(output, "{line}")?,
            }
        }
        Ok(output)
    }

    fn show_json(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        serde_json::to_string_pretty(&self.section_value(section)?).map_err(|_| fmt::Error)
    }

    fn annotate_line(&self, trimmed: &str, table: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let key = trimmed.split('=').next()?.trim();
        let path = if table.is_empty() {
            key.to_owned()
        } else {
            format!("{table}.{key}")
        };
        self.field_sources.get(&path).map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ConfigLayer;

    fn resolved() -> ResolvedConfig {
        let mut field_sources = FieldSources::new();
        field_sources.insert("approval.timeout_ms".to_owned(), ConfigLayer::User);
        field_sources.insert("logging.level".to_owned(), ConfigLayer::Environment);
        ResolvedConfig {
            config: Config::default(),
            field_sources,
            loaded_files: vec!["/home/me/.sage/config.toml".to_owned()],
        }
    }

    #[test]
    fn test_show_toml_annotates_sources() {
        let output = resolved().show(ShowFormat::Toml, None).unwrap();
        assert!(output.contains("Resolved Sage configuration"));
        assert!(output.contains("1. /home/me/.sage/config.toml"));
        assert!(output.contains("timeout_ms = 120000  # [user]"));
        assert!(output.contains("level = \"info\"  # [env]"));
    }

    #[test]
    fn test_show_section() {
        let output = resolved().show(ShowFormat::Toml, Some("tools")).unwrap();
        assert!(output.contains("grep_results_max"));
        assert!(!output.contains("timeout_ms"));
        assert!(resolved().show(ShowFormat::Toml, Some("nope")).is_err());
    }

    #[test]
    fn test_show_json() {
        let output = resolved().show(ShowFormat::Json, Some("approval")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["poll_interval_ms"], 500);
    }
}
