//! Tool call and result events for observers (chat UIs, transcripts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether an event marks the start or the end of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolEventKind {
    /// The tool was invoked.
    ToolCall,
    /// The tool answered.
    ToolResult,
}

/// One observable step of a tool dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEvent {
    /// Call or result.
    #[serde(rename = "type")]
    pub kind: ToolEventKind,
    /// Tool name.
    pub tool: String,
    /// Arguments the tool was called with.
    pub args: Value,
    /// The answer, on result events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

impl ToolEvent {
    /// A call event.
    #[must_use]
    pub fn call(tool: impl Into<String>, args: Value) -> Self {
        Self {
            kind: ToolEventKind::ToolCall,
            tool: tool.into(),
            args,
            result: None,
            timestamp: Utc::now(),
        }
    }

    /// A result event.
    #[must_use]
    pub fn result(tool: impl Into<String>, args: Value, result: Value) -> Self {
        Self {
            kind: ToolEventKind::ToolResult,
            tool: tool.into(),
            args,
            result: Some(result),
            timestamp: Utc::now(),
        }
    }
}
