//! Write file tool: creates or overwrites a note, creating a missing parent folder.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, vault_path};
use sage_vault::path::parent;
use serde_json::Value;

/// Built-in tool for writing notes.
pub struct WriteFileTool;

#[async_trait::async_trait]
impl BuiltinTool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Write content to a file in the vault. Creates the parent folder if it doesn't \
         exist. Overwrites the file if it already exists."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path where the file should be written"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let path = vault_path(&args, "path")?;
        let content = args
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("content is required".into()))?;

        let existed = match ctx.vault.find_entry(&path).await {
            Some(entry) if entry.is_folder() => return Err(ToolError::AlreadyExists(path)),
            Some(_) => true,
            None => false,
        };

        let folder = parent(&path);
        if !existed && !folder.is_empty() && ctx.vault.find_folder(folder).await.is_none() {
            tracing::debug!(folder, "Creating parent folder for new file");
            ctx.vault.create_folder(folder).await?;
        }

        ctx.vault.write(&path, content).await?;

        Ok(serde_json::json!({
            "success": true,
            "path": path,
            "message": if existed {
                "File updated successfully"
            } else {
                "File created successfully"
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use sage_vault::Vault;

    #[tokio::test]
    async fn test_create_with_missing_parent() {
        let (vault, ctx) = context(&[]);
        let result = WriteFileTool
            .execute(
                serde_json::json!({"path": "Daily/2026/10-18.md", "content": "# Sunday"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result["message"], "File created successfully");
        let file = vault.find_file("Daily/2026/10-18.md").await.unwrap();
        assert_eq!(vault.read(&file).await.unwrap(), "# Sunday");
    }

    #[tokio::test]
    async fn test_overwrite() {
        let (vault, ctx) = context(&[("a.md", "old")]);
        let result = WriteFileTool
            .execute(serde_json::json!({"path": "a.md", "content": "new"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["message"], "File updated successfully");
        let file = vault.find_file("a.md").await.unwrap();
        assert_eq!(vault.read(&file).await.unwrap(), "new");
    }

    #[tokio::test]
    async fn test_refuses_folder_and_traversal() {
        let (_vault, ctx) = context(&[("Notes/a.md", "")]);
        let err = WriteFileTool
            .execute(serde_json::json!({"path": "Notes", "content": ""}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::AlreadyExists(_)));

        let err = WriteFileTool
            .execute(serde_json::json!({"path": "../escape.md", "content": ""}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Vault(_)));
    }

    #[tokio::test]
    async fn test_requires_content() {
        let (_vault, ctx) = context(&[]);
        let err = WriteFileTool
            .execute(serde_json::json!({"path": "a.md"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
