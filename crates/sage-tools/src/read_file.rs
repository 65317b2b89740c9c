//! Read file tool: returns a note's content.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, truncate_output, vault_path};
use serde_json::Value;

/// Built-in tool for reading notes.
pub struct ReadFileTool;

#[async_trait::async_trait]
impl BuiltinTool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read a file in the vault. Returns its path, name and content. \
         Very large files are truncated."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file to read, relative to the vault root"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let path = vault_path(&args, "path")?;
        let file = ctx
            .vault
            .find_file(&path)
            .await
            .ok_or_else(|| ToolError::PathNotFound(path.clone()))?;

        let content = ctx.vault.read(&file).await?;
        let content = truncate_output(content, ctx.limits.max_output_chars);

        Ok(serde_json::json!({
            "path": file.path,
            "name": file.name(),
            "content": content,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolLimits;
    use crate::test_support::context;

    #[tokio::test]
    async fn test_read_file() {
        let (_vault, ctx) = context(&[("Notes/todo.md", "- [ ] water plants")]);
        let result = ReadFileTool
            .execute(serde_json::json!({"path": "Notes/todo.md"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["path"], "Notes/todo.md");
        assert_eq!(result["name"], "todo.md");
        assert_eq!(result["content"], "- [ ] water plants");
    }

    #[tokio::test]
    async fn test_read_missing_and_folder() {
        let (_vault, ctx) = context(&[("Notes/todo.md", "")]);
        let err = ReadFileTool
            .execute(serde_json::json!({"path": "Notes/none.md"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PathNotFound(p) if p == "Notes/none.md"));

        let err = ReadFileTool
            .execute(serde_json::json!({"path": "Notes"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PathNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_truncates() {
        let body = "x".repeat(500);
        let (_vault, ctx) = context(&[("big.md", body.as_str())]);
        let ctx = ctx.with_limits(ToolLimits {
            max_output_chars: 100,
            ..ToolLimits::default()
        });
        let result = ReadFileTool
            .execute(serde_json::json!({"path": "big.md"}), &ctx)
            .await
            .unwrap();
        let content = result["content"].as_str().unwrap();
        assert!(content.contains("content truncated"));
        assert!(content.len() < 500);
    }

    #[tokio::test]
    async fn test_read_requires_path() {
        let (_vault, ctx) = context(&[]);
        let err = ReadFileTool
            .execute(serde_json::json!({}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
