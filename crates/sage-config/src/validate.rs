//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_approval(config)?;
    validate_tools(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: field.to_owned(),
        reason: message.into(),
    }
}

fn validate_approval(config: &Config) -> ConfigResult<()> {
    let a = &config.approval;
    if a.timeout_ms == 0 {
        return Err(invalid("approval.timeout_ms", "must be greater than 0"));
    }
    if a.poll_interval_ms == 0 {
        return Err(invalid("approval.poll_interval_ms", "must be greater than 0"));
    }
    if a.poll_interval_ms > a.timeout_ms {
        return Err(invalid(
            "approval.poll_interval_ms",
            format!(
                "poll interval ({}ms) must not exceed the timeout ({}ms)",
                a.poll_interval_ms, a.timeout_ms
            ),
        ));
    }
    Ok(())
}

fn validate_tools(config: &Config) -> ConfigResult<()> {
    let t = &config.tools;
    for (field, value) in [
        ("tools.search_results_max", t.search_results_max),
        ("tools.grep_results_max", t.grep_results_max),
        ("tools.max_output_chars", t.max_output_chars),
    ] {
        if value == 0 {
            return Err(invalid(field, "must be greater than 0"));
        }
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;
    if !matches!(
        l.level.to_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported level '{}'; expected one of: trace, debug, info, warn, error",
                l.level
            ),
        ));
    }
    if !matches!(l.format.as_str(), "pretty" | "compact" | "json") {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: pretty, compact, json",
                l.format
            ),
        ));
    }
    Ok(())
}
