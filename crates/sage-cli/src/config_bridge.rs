//! Bridge from `sage_config::Config` to domain types.

use std::path::PathBuf;

use sage_approval::ExecutorConfig;
use sage_config::Config;
use sage_telemetry::{LogConfig, LogFormat};
use sage_tools::ToolLimits;

/// Convert config to the executor's timing.
pub(crate) fn to_executor_config(cfg: &Config) -> ExecutorConfig {
    ExecutorConfig::default()
        .with_approval_timeout(cfg.approval.timeout())
        .with_poll_interval(cfg.approval.poll_interval())
}

/// Convert config to [`ToolLimits`].
pub(crate) fn to_tool_limits(cfg: &Config) -> ToolLimits {
    ToolLimits {
        search_results_max: cfg.tools.search_results_max,
        grep_results_max: cfg.tools.grep_results_max,
        max_output_chars: cfg.tools.max_output_chars,
    }
}

/// Convert config to [`LogConfig`].
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let format = cfg
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();

    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);
    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }
    log_config
}

/// Pick the vault root: the flag, then `vault.root`, then the working
/// directory.
pub(crate) fn vault_root(cfg: &Config, flag: Option<PathBuf>) -> std::io::Result<PathBuf> {
    match flag.or_else(|| cfg.vault.root.as_ref().map(PathBuf::from)) {
        Some(root) => Ok(root),
        None => std::env::current_dir(),
    }
}
