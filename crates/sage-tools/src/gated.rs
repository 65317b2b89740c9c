//! Shared submission path for the approval-gated tools.

use sage_approval::PendingOperation;
use serde_json::Value;

use crate::{ToolContext, ToolResult};

/// Register `op` with the operation manager and build the pending acknowledgment.
///
/// `action` completes the sentence "... operation is pending user approval",
/// e.g. `"File delete"`.
pub(crate) fn submit(ctx: &ToolContext, op: PendingOperation, action: &str) -> ToolResult {
    let description = op.description.clone();
    let kind = op.kind;
    let id = ctx.operations.submit(op);
    tracing::info!(operation_id = %id, %kind, %description, "Operation awaiting approval");

    Ok(serde_json::json!({
        "success": true,
        "pending": true,
        "operationId": id.0.to_string(),
        "message": format!("{action} operation is pending user approval"),
        "description": description,
    }))
}

/// Input schema with string properties, all required.
pub(crate) fn string_schema(properties: &[(&str, &str)]) -> Value {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, description)| {
            (
                (*name).to_string(),
                serde_json::json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    serde_json::json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}
