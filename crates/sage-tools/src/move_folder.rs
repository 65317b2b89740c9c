//! Move folder tool (approval-gated).

use crate::gated::{string_schema, submit};
use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_approval::PendingOperation;
use sage_vault::path::{is_within, parent};
use serde_json::Value;

/// Requests moving a folder, with its contents, to another path.
pub struct MoveFolderTool;

#[async_trait::async_trait]
impl BuiltinTool for MoveFolderTool {
    fn name(&self) -> &'static str {
        "move_folder"
    }

    fn description(&self) -> &'static str {
        "Request to move a folder to a new location in the vault. The destination's \
         parent folder must already exist. This operation requires user approval."
    }

    fn input_schema(&self) -> Value {
        string_schema(&[
            ("path", "The path of the folder to move"),
            ("targetPath", "The destination path for the folder"),
        ])
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let path = vault_path(&args, "path")?;
        let target = vault_path(&args, "targetPath")?;

        match ctx.vault.find_entry(&path).await {
            None => return Err(ToolError::PathNotFound(path)),
            Some(entry) if entry.is_file() => {
                return Err(ToolError::InvalidArguments(format!(
                    "\"{path}\" is a file, not a folder"
                )));
            },
            Some(_) => {},
        }
        if is_within(&target, &path) {
            return Err(ToolError::InvalidArguments(format!(
                "Cannot move \"{path}\" into itself"
            )));
        }
        let target_parent = parent(&target);
        if !target_parent.is_empty() && ctx.vault.find_folder(target_parent).await.is_none() {
            return Err(ToolError::PathNotFound(target_parent.to_string()));
        }
        if ctx.vault.find_entry(&target).await.is_some() {
            return Err(ToolError::AlreadyExists(target));
        }

        submit(ctx, PendingOperation::move_folder(path, target), "Folder move")
    }
}
