//! CLI handlers for the `sage config` subcommand.

use std::path::Path;

use anyhow::Result;
use sage_config::{ConfigResult, ResolvedConfig, ShowFormat};

use crate::theme::Theme;

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(
    resolved: ResolvedConfig,
    format: &str,
    section: Option<&str>,
) -> Result<()> {
    let show_format = match format {
        "json" => ShowFormat::Json,
        _ => ShowFormat::Toml,
    };

    let output = resolved
        .show(show_format, section)
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;

    println!("{output}");
    Ok(())
}

/// Report whether the configuration loads and validates.
pub(crate) fn validate_config(loaded: ConfigResult<ResolvedConfig>) {
    match loaded {
        Ok(resolved) => {
            println!("{}", Theme::success("Configuration is valid."));
            if !resolved.loaded_files.is_empty() {
                println!("\nLoaded files:");
                for path in &resolved.loaded_files {
                    println!("  - {path}");
                }
            }
        },
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("Configuration error: {e}")));
            std::process::exit(1);
        },
    }
}

/// Show all config file paths that are checked.
pub(crate) fn show_paths(explicit: Option<&Path>) {
    let mut paths = Vec::new();
    match directories::BaseDirs::new() {
        Some(dirs) => paths.push(dirs.home_dir().join(".sage").join("config.toml")),
        None => println!("{}", Theme::warning("Could not determine home directory")),
    }
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }

    println!("Configuration files checked (in precedence order):\n");
    for (i, path) in paths.iter().enumerate() {
        let status = if path.exists() { "found" } else { "not found" };
        println!("  {}. {}  [{status}]", i.saturating_add(1), path.display());
    }

    println!("\nEnvironment variable fallbacks:");
    println!("  SAGE_VAULT_ROOT                -> vault.root");
    println!("  SAGE_APPROVAL_TIMEOUT_MS       -> approval.timeout_ms");
    println!("  SAGE_APPROVAL_POLL_INTERVAL_MS -> approval.poll_interval_ms");
    println!("  SAGE_LOG_LEVEL                 -> logging.level");
    println!("  SAGE_LOG_FORMAT                -> logging.format");
}
