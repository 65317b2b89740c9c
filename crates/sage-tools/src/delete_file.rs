//! Delete file tool (approval-gated).

use crate::gated::{string_schema, submit};
use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_approval::PendingOperation;
use serde_json::Value;

/// Requests deleting a note.
pub struct DeleteFileTool;

#[async_trait::async_trait]
impl BuiltinTool for DeleteFileTool {
    fn name(&self) -> &'static str {
        "delete_file"
    }

    fn description(&self) -> &'static str {
        "Request to delete a file from the vault. This operation requires user approval."
    }

    fn input_schema(&self) -> Value {
        string_schema(&[("path", "The path of the file to delete")])
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let path = vault_path(&args, "path")?;
        if ctx.vault.find_file(&path).await.is_none() {
            return Err(ToolError::PathNotFound(path));
        }
        submit(ctx, PendingOperation::delete(path), "File delete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use sage_approval::{ErrorKind, OperationId};
    use sage_vault::Vault;

    #[tokio::test]
    async fn test_delete_then_reject() {
        let (vault, ctx) = context(&[("Inbox/spam.md", "")]);
        let ack = DeleteFileTool
            .execute(serde_json::json!({"path": "Inbox/spam.md"}), &ctx)
            .await
            .unwrap();
        assert_eq!(ack["description"], "Delete file \"Inbox/spam.md\"");

        let id: OperationId = ack["operationId"].as_str().unwrap().parse().unwrap();
        assert_eq!(ctx.operations.pending().len(), 1);
        assert!(ctx.operations.reject(&id));

        let err = ctx.operations.execute(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert!(vault.find_file("Inbox/spam.md").await.is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_registers_nothing() {
        let (_vault, ctx) = context(&[("Notes/a.md", "")]);
        for path in ["ghost.md", "Notes", ""] {
            assert!(
                DeleteFileTool
                    .execute(serde_json::json!({"path": path}), &ctx)
                    .await
                    .is_err()
            );
        }
        assert!(ctx.operations.all().is_empty());
    }
}
