//! Rename file tool (approval-gated).

use crate::gated::{string_schema, submit};
use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_approval::PendingOperation;
use serde_json::Value;

/// Requests renaming a note; the rename runs once a person approves it.
pub struct RenameFileTool;

#[async_trait::async_trait]
impl BuiltinTool for RenameFileTool {
    fn name(&self) -> &'static str {
        "rename_file"
    }

    fn description(&self) -> &'static str {
        "Request to rename a file in the vault. This operation requires user approval; \
         the answer only confirms that the request is pending."
    }

    fn input_schema(&self) -> Value {
        string_schema(&[
            ("oldPath", "The current path of the file to rename"),
            ("newPath", "The new path for the file"),
        ])
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let old_path = vault_path(&args, "oldPath")?;
        let new_path = vault_path(&args, "newPath")?;

        if ctx.vault.find_file(&old_path).await.is_none() {
            return Err(ToolError::PathNotFound(old_path));
        }
        if ctx.vault.find_entry(&new_path).await.is_some() {
            return Err(ToolError::AlreadyExists(new_path));
        }

        submit(ctx, PendingOperation::rename(old_path, new_path), "File rename")
    }
}
