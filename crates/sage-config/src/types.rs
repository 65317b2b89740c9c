//! Configuration types for Sage.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal sage crates. Domain types (`ExecutorConfig`, `ToolLimits`,
//! `LogConfig`) are built from these at the binary boundary. Every struct
//! implements [`Default`] with the same values as `defaults.toml`, so a bare
//! `[section]` header produces a working configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which vault to operate on.
    pub vault: VaultSection,
    /// Approval wait timing.
    pub approval: ApprovalSection,
    /// Result-size limits for the agent tools.
    pub tools: ToolsSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// VaultSection
// ---------------------------------------------------------------------------

/// Vault location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSection {
    /// Root directory of the vault. `None` means the current directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

// ---------------------------------------------------------------------------
// ApprovalSection
// ---------------------------------------------------------------------------

/// Timing of the approval wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSection {
    /// How long a pending operation waits for a decision, in milliseconds.
    pub timeout_ms: u64,
    /// Interval between registry re-reads while waiting, in milliseconds.
    pub poll_interval_ms: u64,
}

impl ApprovalSection {
    /// [`timeout_ms`](Self::timeout_ms) as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// [`poll_interval_ms`](Self::poll_interval_ms) as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ApprovalSection {
    fn default() -> Self {
        Self {
            timeout_ms: 120_000,
            poll_interval_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// ToolsSection
// ---------------------------------------------------------------------------

/// Output limits of the read-only tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// Maximum `search_files` results.
    pub search_results_max: usize,
    /// Maximum files reported by `grep_files`.
    pub grep_results_max: usize,
    /// Maximum `read_file` content, in bytes.
    pub max_output_chars: usize,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            search_results_max: 20,
            grep_results_max: 50,
            max_output_chars: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"` or `"json"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["sage_approval=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
