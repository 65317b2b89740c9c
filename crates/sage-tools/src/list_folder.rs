//! List folder tool: direct children of a vault folder, folders and files apart.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use serde_json::Value;

/// Built-in tool for browsing the vault tree.
pub struct ListFolderTool;

#[async_trait::async_trait]
impl BuiltinTool for ListFolderTool {
    fn name(&self) -> &'static str {
        "list_folder"
    }

    fn description(&self) -> &'static str {
        "List all files and folders directly inside a folder of the vault. \
         Use an empty string or \"/\" for the vault root."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The folder to list. Use empty string or \"/\" for root"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let raw = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("path is required".into()))?;
        let path = sage_vault::path::normalize(raw)?;

        if !path.is_empty() && ctx.vault.find_folder(&path).await.is_none() {
            return Err(ToolError::PathNotFound(path));
        }

        let mut entries = ctx.vault.list(&path).await?;
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        let (folders, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(sage_vault::VaultEntry::is_folder);
        let folders: Vec<Value> = folders
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name(),
                    "path": f.path,
                    "type": "folder",
                })
            })
            .collect();
        let files: Vec<Value> = files
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name(),
                    "path": f.path,
                    "type": "file",
                    "extension": f.extension(),
                })
            })
            .collect();

        Ok(serde_json::json!({
            "success": true,
            "path": path,
            "folders": folders,
            "files": files,
        }))
    }
}
