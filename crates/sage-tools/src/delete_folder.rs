//! Delete folder tool (approval-gated). Deletion is recursive.

use crate::gated::{string_schema, submit};
use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_approval::PendingOperation;
use serde_json::Value;

/// Requests deleting a folder and everything in it.
pub struct DeleteFolderTool;

#[async_trait::async_trait]
impl BuiltinTool for DeleteFolderTool {
    fn name(&self) -> &'static str {
        "delete_folder"
    }

    fn description(&self) -> &'static str {
        "Request to delete a folder and all of its contents from the vault. \
         This operation requires user approval."
    }

    fn input_schema(&self) -> Value {
        string_schema(&[("path", "The path of the folder to delete")])
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let path = vault_path(&args, "path")?;
        match ctx.vault.find_entry(&path).await {
            None => return Err(ToolError::PathNotFound(path)),
            Some(entry) if entry.is_file() => {
                return Err(ToolError::InvalidArguments(format!(
                    "\"{path}\" is a file, not a folder"
                )));
            },
            Some(_) => {},
        }
        submit(ctx, PendingOperation::delete_folder(path), "Folder delete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use sage_vault::Vault;

    #[tokio::test]
    async fn test_delete_folder_flow() {
        let (vault, ctx) = context(&[("Old/a.md", ""), ("Old/Deep/b.md", "")]);
        let ack = DeleteFolderTool
            .execute(serde_json::json!({"path": "Old"}), &ctx)
            .await
            .unwrap();
        assert_eq!(ack["description"], "Delete folder \"Old\"");

        let id = ack["operationId"].as_str().unwrap().parse().unwrap();
        ctx.operations.approve(&id);
        ctx.operations.execute(&id).await.unwrap();
        assert!(vault.find_entry("Old").await.is_none());
        assert!(vault.is_empty());
    }

    #[tokio::test]
    async fn test_delete_folder_prechecks() {
        let (_vault, ctx) = context(&[("Old/a.md", "")]);
        let err = DeleteFolderTool
            .execute(serde_json::json!({"path": "Old/a.md"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(m) if m.contains("is a file")));

        let err = DeleteFolderTool
            .execute(serde_json::json!({"path": "New"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PathNotFound(_)));
        assert!(ctx.operations.all().is_empty());
    }
}
