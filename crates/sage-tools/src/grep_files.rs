//! Grep files tool: regex search over the lines of every markdown note.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use globset::{GlobBuilder, GlobMatcher};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_json::Value;

/// Built-in tool for searching note contents.
pub struct GrepFilesTool;

#[derive(Debug, Serialize)]
struct LineMatch {
    line: usize,
    content: String,
    #[serde(rename = "match")]
    matched: String,
    position: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMatches {
    file: String,
    name: String,
    matches: Vec<LineMatch>,
    match_count: usize,
}

#[async_trait::async_trait]
impl BuiltinTool for GrepFilesTool {
    fn name(&self) -> &'static str {
        "grep_files"
    }

    fn description(&self) -> &'static str {
        "Search for text content across all notes in the vault (grep-like). \
         The pattern is a regular expression matched line by line. \
         Results are grouped by file, files with the most matches first."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "The regular expression to search for in file contents"
                },
                "caseSensitive": {
                    "type": "boolean",
                    "description": "Whether the search is case sensitive (default: false)"
                },
                "filePattern": {
                    "type": "string",
                    "description": "Optional glob to restrict which files are searched (e.g. \"Projects/*.md\")"
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let pattern = args
            .get("pattern")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("Search pattern cannot be empty".into())
            })?;
        let case_sensitive = args
            .get("caseSensitive")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let filter = args
            .get("filePattern")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(file_filter)
            .transpose()?;

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| ToolError::InvalidArguments(format!("Invalid pattern: {e}")))?;

        let mut files = ctx.vault.markdown_files().await?;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut results = Vec::new();
        for file in files {
            if filter.as_ref().is_some_and(|glob| !glob.is_match(&file.path)) {
                continue;
            }
            let content = match ctx.vault.read(&file).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!(path = %file.path, error = %e, "Skipping unreadable file");
                    continue;
                },
            };
            let matches = search_lines(&regex, &content);
            if !matches.is_empty() {
                results.push(FileMatches {
                    name: file.name().to_string(),
                    file: file.path,
                    match_count: matches.len(),
                    matches,
                });
            }
        }

        let matched_files = results.len();
        let total_matches = results
            .iter()
            .map(|r| r.match_count)
            .fold(0usize, usize::saturating_add);
        results.sort_by(|a, b| b.match_count.cmp(&a.match_count));
        let limit_reached = results.len() > ctx.limits.grep_results_max;
        results.truncate(ctx.limits.grep_results_max);

        Ok(serde_json::json!({
            "success": true,
            "matches": results,
            "matchedFiles": matched_files,
            "totalMatches": total_matches,
            "limitReached": limit_reached,
        }))
    }
}

fn file_filter(pattern: &str) -> Result<GlobMatcher, ToolError> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .case_insensitive(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ToolError::InvalidArguments(format!("Invalid file pattern: {e}")))
}

fn search_lines(regex: &Regex, content: &str) -> Vec<LineMatch> {
    content
        .split('\n')
        .enumerate()
        .flat_map(|(idx, line)| {
            regex.find_iter(line).map(move |m| LineMatch {
                line: idx.saturating_add(1),
                content: line.trim().to_string(),
                matched: m.as_str().to_string(),
                position: line[..m.start()].chars().count(),
            })
        })
        .collect()
}
