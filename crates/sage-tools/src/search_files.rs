//! Search files tool: ranks markdown notes by how well their name and path match a query.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use sage_vault::VaultEntry;
use serde_json::Value;

const EXACT_NAME_SCORE: u32 = 10;
const NAME_SCORE: u32 = 5;
const PATH_SCORE: u32 = 2;

/// Built-in tool for finding notes by name.
pub struct SearchFilesTool;

#[async_trait::async_trait]
impl BuiltinTool for SearchFilesTool {
    fn name(&self) -> &'static str {
        "search_files"
    }

    fn description(&self) -> &'static str {
        "Search for files in the vault by name and path. Every whitespace-separated \
         term is matched case-insensitively; exact file names rank highest. \
         Returns the best matches first."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find files in the vault"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("query is required".into()))?;
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Err(ToolError::InvalidArguments("Empty search query".into()));
        }

        let mut files = ctx.vault.markdown_files().await?;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut scored: Vec<(u32, VaultEntry)> = files
            .into_iter()
            .map(|file| (score(&file, &terms), file))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(ctx.limits.search_results_max);

        Ok(Value::Array(
            scored
                .into_iter()
                .map(|(matches, file)| {
                    serde_json::json!({
                        "file": file.path,
                        "name": file.name(),
                        "matches": matches,
                    })
                })
                .collect(),
        ))
    }
}

fn score(file: &VaultEntry, terms: &[String]) -> u32 {
    let name = file.name().to_lowercase();
    let path = file.path.to_lowercase();
    terms
        .iter()
        .map(|term| {
            if name == *term {
                EXACT_NAME_SCORE
            } else if name.contains(term.as_str()) {
                NAME_SCORE
            } else if path.contains(term.as_str()) {
                PATH_SCORE
            } else {
                0
            }
        })
        .fold(0, u32::saturating_add)
}
