//! `sage call`: run one tool and settle the operation it may have queued.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use sage_approval::{OperationId, OperationManager, PendingOperation, outcome};
use sage_config::Config;
use sage_tools::{ToolContext, ToolRegistry};
use sage_vault::{HostVault, Vault};
use serde_json::Value;

use crate::config_bridge;
use crate::theme::Theme;

/// How a pending operation gets decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Approve,
    Reject,
    Prompt,
}

pub(crate) async fn run_call(
    cfg: &Config,
    tool: &str,
    raw_args: &str,
    vault_flag: Option<PathBuf>,
    decision: Decision,
) -> Result<()> {
    let args: Value =
        serde_json::from_str(raw_args).context("tool arguments must be valid JSON")?;
    if !args.is_object() {
        bail!("tool arguments must be a JSON object");
    }

    let root = config_bridge::vault_root(cfg, vault_flag)
        .context("could not determine the vault root")?;
    if !root.is_dir() {
        bail!("vault root {} is not a directory", root.display());
    }
    tracing::debug!(root = %root.display(), tool, "running tool");

    let vault: Arc<dyn Vault> = Arc::new(HostVault::new(root));
    let manager = Arc::new(OperationManager::new(
        Arc::clone(&vault),
        config_bridge::to_executor_config(cfg),
    ));
    let ctx = ToolContext::new(vault, Arc::clone(&manager))
        .with_limits(config_bridge::to_tool_limits(cfg));

    let response = ToolRegistry::with_defaults()
        .dispatch(tool, args, &ctx)
        .await;
    let Some(id) = pending_id(&response) else {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    };

    let op = manager
        .get(&id)
        .with_context(|| format!("operation {id} vanished before a decision"))?;
    eprintln!("{}", Theme::approval_box("Approval required", &describe(&op)));

    let approved = match decision {
        Decision::Approve => true,
        Decision::Reject => false,
        Decision::Prompt => tokio::task::spawn_blocking(confirm).await??,
    };
    if approved {
        manager.approve(&id);
        eprintln!("{}", Theme::success("Approved"));
    } else {
        manager.reject(&id);
        eprintln!("{}", Theme::warning("Rejected"));
    }

    let result = manager.execute(&id).await;
    if let Err(e) = &result {
        tracing::debug!(operation_id = %id, error = %e, "operation did not complete");
    }
    println!("{}", serde_json::to_string_pretty(&outcome::to_payload(&result))?);
    Ok(())
}

/// The operation id of a "pending approval" acknowledgment.
fn pending_id(response: &Value) -> Option<OperationId> {
    if response.get("pending").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    response.get("operationId")?.as_str()?.parse().ok()
}

fn describe(op: &PendingOperation) -> String {
    let mut lines = vec![
        Theme::kv("Operation", op.kind.as_str()),
        Theme::kv("Source", &op.source_path),
    ];
    if let Some(target) = &op.target_path {
        lines.push(Theme::kv("Target", target));
    }
    lines.push(String::new());
    lines.push(Theme::dimmed(&op.description));
    lines.join("\n")
}

fn confirm() -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Apply this change to the vault?")
        .default(false)
        .interact()
        .context("failed to read the approval answer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_id() {
        let id = OperationId::new();
        let ack = serde_json::json!({
            "success": true,
            "pending": true,
            "operationId": id.0.to_string(),
        });
        assert_eq!(pending_id(&ack), Some(id));

        let plain = serde_json::json!({"success": true, "message": "File created successfully"});
        assert_eq!(pending_id(&plain), None);

        let garbled = serde_json::json!({"pending": true, "operationId": "nope"});
        assert_eq!(pending_id(&garbled), None);
    }

    #[test]
    fn test_describe_lists_target() {
        colored::control::set_override(false);
        let text = describe(&PendingOperation::move_file("a.md", "Archive/a.md"));
        assert!(text.contains("Source: a.md"));
        assert!(text.contains("Target: Archive/a.md"));
        assert!(text.contains("Move file"));
    }

    #[tokio::test]
    async fn test_call_with_approve_mutates_vault() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.md"), "body").unwrap();

        run_call(
            &Config::default(),
            "rename_file",
            r#"{"oldPath": "old.md", "newPath": "new.md"}"#,
            Some(dir.path().to_path_buf()),
            Decision::Approve,
        )
        .await
        .unwrap();

        assert!(!dir.path().join("old.md").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("new.md")).unwrap(),
            "body"
        );
    }

    #[tokio::test]
    async fn test_call_with_reject_leaves_vault() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("keep.md"), "x").unwrap();

        run_call(
            &Config::default(),
            "delete_file",
            r#"{"path": "keep.md"}"#,
            Some(dir.path().to_path_buf()),
            Decision::Reject,
        )
        .await
        .unwrap();

        assert!(dir.path().join("keep.md").exists());
    }

    #[tokio::test]
    async fn test_call_rejects_non_object_args() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_call(
            &Config::default(),
            "read_file",
            "[1, 2]",
            Some(dir.path().to_path_buf()),
            Decision::Prompt,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }
}
