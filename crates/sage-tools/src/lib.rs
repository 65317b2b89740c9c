#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Vault tools for the Sage agent runtime.
//!
//! Provides 11 tools as direct Rust function calls. Five are read-only or
//! plain writes and hit the vault directly: search, read, grep, list and
//! write. The other six (rename, delete and move for files; create, delete
//! and move for folders) only validate their arguments, register a
//! [`PendingOperation`](sage_approval::PendingOperation) and answer with a
//! pending acknowledgment. The mutation happens later, once a person
//! approves it.

mod create_folder;
mod delete_file;
mod delete_folder;
mod events;
mod gated;
mod grep_files;
mod list_folder;
mod move_file;
mod move_folder;
mod read_file;
mod rename_file;
mod search_files;
mod truncate;
mod write_file;

pub use create_folder::CreateFolderTool;
pub use delete_file::DeleteFileTool;
pub use delete_folder::DeleteFolderTool;
pub use events::{ToolEvent, ToolEventKind};
pub use grep_files::GrepFilesTool;
pub use list_folder::ListFolderTool;
pub use move_file::MoveFileTool;
pub use move_folder::MoveFolderTool;
pub use read_file::ReadFileTool;
pub use rename_file::RenameFileTool;
pub use search_files::SearchFilesTool;
pub use truncate::{truncate_at_char_boundary, truncate_output};
pub use write_file::WriteFileTool;

use sage_approval::{OperationError, OperationManager};
use sage_vault::{Vault, VaultError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default cap on search results.
pub const DEFAULT_SEARCH_RESULTS_MAX: usize = 20;
/// Default cap on files reported by grep.
pub const DEFAULT_GREP_RESULTS_MAX: usize = 50;
/// Default maximum file content returned by `read_file`, in bytes.
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 30_000;

/// A built-in tool that executes directly in-process.
#[async_trait::async_trait]
pub trait BuiltinTool: Send + Sync {
    /// Tool name as the model calls it.
    fn name(&self) -> &'static str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &'static str;

    /// JSON schema for tool input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult;
}

/// Result-size limits applied by the read-only tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolLimits {
    /// Maximum `search_files` results.
    pub search_results_max: usize,
    /// Maximum files reported by `grep_files`.
    pub grep_results_max: usize,
    /// Maximum `read_file` content before truncation.
    pub max_output_chars: usize,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self {
            search_results_max: DEFAULT_SEARCH_RESULTS_MAX,
            grep_results_max: DEFAULT_GREP_RESULTS_MAX,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        }
    }
}

/// Shared context available to all built-in tools.
pub struct ToolContext {
    /// The vault the tools operate on.
    pub vault: Arc<dyn Vault>,
    /// Where gated tools register their operations.
    pub operations: Arc<OperationManager>,
    /// Result-size limits.
    pub limits: ToolLimits,
    events: Option<broadcast::Sender<ToolEvent>>,
}

impl ToolContext {
    /// Create a tool context with default limits and no event channel.
    #[must_use]
    pub fn new(vault: Arc<dyn Vault>, operations: Arc<OperationManager>) -> Self {
        Self {
            vault,
            operations,
            limits: ToolLimits::default(),
            events: None,
        }
    }

    /// Override the result-size limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ToolLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Publish call and result events on `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: broadcast::Sender<ToolEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Subscribe to tool events, if an event channel is attached.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<ToolEvent>> {
        self.events.as_ref().map(broadcast::Sender::subscribe)
    }

    fn emit(&self, event: ToolEvent) {
        if let Some(sender) = &self.events {
            // No receivers is fine.
            let _ = sender.send(event);
        }
    }
}

/// Tool execution errors.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Missing or malformed arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The referenced vault entry does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Something already exists where the tool would create one.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// No tool with this name is registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Vault backend error.
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// Approval subsystem error.
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// Execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Short, stable summary used as the `error` field of the payload.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "Invalid arguments",
            Self::PathNotFound(_) => "Path not found",
            Self::AlreadyExists(_) => "Already exists",
            Self::UnknownTool(_) => "Unknown tool",
            Self::Vault(_) => "Vault error",
            Self::Operation(e) => e.kind().as_str(),
            Self::ExecutionFailed(_) => "Execution failed",
        }
    }

    /// Vault path the error is about, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::PathNotFound(path) | Self::AlreadyExists(path) => Some(path),
            Self::Vault(
                VaultError::NotFound(path)
                | VaultError::AlreadyExists(path)
                | VaultError::NotADirectory(path)
                | VaultError::NotEmpty(path),
            ) => Some(path),
            _ => None,
        }
    }

    /// Error payload: `{"success": false, "error", "message", "path"?}`.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut payload = serde_json::json!({
            "success": false,
            "error": self.summary(),
            "message": self.to_string(),
        });
        if let (Some(path), Some(map)) = (self.path(), payload.as_object_mut()) {
            map.insert("path".into(), Value::String(path.to_string()));
        }
        payload
    }
}

/// Result type for tool execution.
pub type ToolResult = Result<Value, ToolError>;

/// A tool description exported to the LLM runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// JSON schema of the arguments.
    pub input_schema: Value,
}

/// Registry of built-in tools for lookup, dispatch and LLM definition export.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn BuiltinTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with all default tools registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchFilesTool));
        registry.register(Box::new(ReadFileTool));
        registry.register(Box::new(GrepFilesTool));
        registry.register(Box::new(ListFolderTool));
        registry.register(Box::new(WriteFileTool));
        registry.register(Box::new(RenameFileTool));
        registry.register(Box::new(DeleteFileTool));
        registry.register(Box::new(MoveFileTool));
        registry.register(Box::new(CreateFolderTool));
        registry.register(Box::new(DeleteFolderTool));
        registry.register(Box::new(MoveFolderTool));
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Box<dyn BuiltinTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn BuiltinTool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    /// Registered tool names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Export all tool definitions for the LLM, sorted by name.
    #[must_use]
    pub fn all_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Run a tool by name and return its JSON answer.
    ///
    /// Errors never escape: they are rendered with [`ToolError::to_payload`].
    /// A call event and a result event are published on the context's event
    /// channel.
    pub async fn dispatch(&self, name: &str, args: Value, ctx: &ToolContext) -> Value {
        ctx.emit(ToolEvent::call(name, args.clone()));
        tracing::debug!(tool = name, "Tool call");

        let outcome = match self.get(name) {
            Some(tool) => tool.execute(args.clone(), ctx).await,
            None => Err(ToolError::UnknownTool(name.to_string())),
        };
        let payload = match outcome {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool call failed");
                e.to_payload()
            },
        };

        ctx.emit(ToolEvent::result(name, args, payload.clone()));
        payload
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch a required, non-blank string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("{key} is required")))
}

/// Normalize a vault path argument; traversal is rejected here.
pub(crate) fn vault_path(args: &Value, key: &str) -> Result<String, ToolError> {
    Ok(sage_vault::path::normalize(required_str(args, key)?)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "create_folder",
                "delete_file",
                "delete_folder",
                "grep_files",
                "list_folder",
                "move_file",
                "move_folder",
                "read_file",
                "rename_file",
                "search_files",
                "write_file",
            ]
        );
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_all_definitions() {
        let registry = ToolRegistry::with_defaults();
        let defs = registry.all_definitions();
        assert_eq!(defs.len(), 11);
        for def in &defs {
            assert!(!def.description.is_empty());
            assert_eq!(def.input_schema["type"], "object");
            assert!(def.input_schema["required"].is_array(), "{}", def.name);
        }
    }

    #[test]
    fn test_error_payload_carries_path() {
        let payload = ToolError::PathNotFound("Notes/x.md".into()).to_payload();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "Path not found");
        assert_eq!(payload["path"], "Notes/x.md");

        let payload = ToolError::InvalidArguments("path is required".into()).to_payload();
        assert!(payload.get("path").is_none());
    }

    #[test]
    fn test_required_str() {
        let args = serde_json::json!({"path": "  ", "other": "x"});
        assert!(required_str(&args, "path").is_err());
        assert!(required_str(&args, "missing").is_err());
        assert_eq!(required_str(&args, "other").unwrap(), "x");
        assert!(matches!(
            vault_path(&serde_json::json!({"path": "../etc"}), "path"),
            Err(ToolError::Vault(VaultError::SandboxViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_dispatch_emits_events_and_converts_errors() {
        let (_vault, ctx) = test_support::context(&[("a.md", "alpha")]);
        let (tx, _) = broadcast::channel(16);
        let ctx = ctx.with_events(tx);
        let mut rx = ctx.subscribe().unwrap();
        let registry = ToolRegistry::with_defaults();

        let payload = registry
            .dispatch("read_file", serde_json::json!({"path": "missing.md"}), &ctx)
            .await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["path"], "missing.md");

        let call = rx.recv().await.unwrap();
        assert_eq!(call.kind, ToolEventKind::ToolCall);
        assert_eq!(call.tool, "read_file");
        let result = rx.recv().await.unwrap();
        assert_eq!(result.kind, ToolEventKind::ToolResult);
        assert_eq!(result.result, Some(payload));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let (_vault, ctx) = test_support::context(&[]);
        let payload = ToolRegistry::with_defaults()
            .dispatch("format_disk", serde_json::json!({}), &ctx)
            .await;
        assert_eq!(payload["error"], "Unknown tool");
    }
}
