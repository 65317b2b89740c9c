//! Create folder tool (approval-gated).

use crate::gated::{string_schema, submit};
use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_approval::PendingOperation;
use serde_json::Value;

/// Requests creating a folder.
pub struct CreateFolderTool;

#[async_trait::async_trait]
impl BuiltinTool for CreateFolderTool {
    fn name(&self) -> &'static str {
        "create_folder"
    }

    fn description(&self) -> &'static str {
        "Request to create a new folder in the vault. This operation requires user approval."
    }

    fn input_schema(&self) -> Value {
        string_schema(&[("path", "The path where the folder should be created")])
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let path = vault_path(&args, "path")?;
        if ctx.vault.find_entry(&path).await.is_some() {
            return Err(ToolError::AlreadyExists(path));
        }
        submit(ctx, PendingOperation::create_folder(path), "Folder create")
    }
}
