//! Move file tool (approval-gated).

use crate::gated::{string_schema, submit};
use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_approval::PendingOperation;
use serde_json::Value;

/// Requests moving a note to another path.
pub struct MoveFileTool;

#[async_trait::async_trait]
impl BuiltinTool for MoveFileTool {
    fn name(&self) -> &'static str {
        "move_file"
    }

    fn description(&self) -> &'static str {
        "Request to move a file to a new location in the vault. Missing destination \
         folders are created. This operation requires user approval."
    }

    fn input_schema(&self) -> Value {
        string_schema(&[
            ("sourcePath", "The current path of the file"),
            ("targetPath", "The new path where the file should be moved"),
        ])
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let source = vault_path(&args, "sourcePath")?;
        let target = vault_path(&args, "targetPath")?;

        if ctx.vault.find_file(&source).await.is_none() {
            return Err(ToolError::PathNotFound(source));
        }
        if ctx.vault.find_entry(&target).await.is_some() {
            return Err(ToolError::AlreadyExists(target));
        }

        submit(ctx, PendingOperation::move_file(source, target), "File move")
    }
}
