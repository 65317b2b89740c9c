//! Shared harness: a host vault in a temp dir wired to the full tool stack.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sage_approval::{ExecutorConfig, OperationId, OperationManager};
use sage_tools::{ToolContext, ToolEvent, ToolRegistry};
use sage_vault::{HostVault, Vault};
use serde_json::Value;
use tokio::sync::broadcast;

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub manager: Arc<OperationManager>,
    pub ctx: ToolContext,
    pub registry: ToolRegistry,
}

impl Harness {
    /// Build a harness whose approval wait gives up after `timeout`.
    pub fn with_timeout(files: &[(&str, &str)], timeout: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let physical = dir.path().join(path);
            std::fs::create_dir_all(physical.parent().unwrap()).unwrap();
            std::fs::write(physical, content).unwrap();
        }

        let vault: Arc<dyn Vault> = Arc::new(HostVault::new(dir.path()));
        let manager = Arc::new(OperationManager::new(
            Arc::clone(&vault),
            ExecutorConfig::default()
                .with_approval_timeout(timeout)
                .with_poll_interval(Duration::from_millis(10)),
        ));
        let (events, _) = broadcast::channel(64);
        let ctx = ToolContext::new(vault, Arc::clone(&manager)).with_events(events);

        Self {
            dir,
            manager,
            ctx,
            registry: ToolRegistry::with_defaults(),
        }
    }

    pub fn new(files: &[(&str, &str)]) -> Self {
        Self::with_timeout(files, Duration::from_secs(5))
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn host_path(&self, vault_path: &str) -> PathBuf {
        self.dir.path().join(vault_path)
    }

    pub async fn call(&self, tool: &str, args: Value) -> Value {
        self.registry.dispatch(tool, args, &self.ctx).await
    }

    /// Call a gated tool and return the id from its acknowledgment.
    pub async fn submit(&self, tool: &str, args: Value) -> OperationId {
        let ack = self.call(tool, args).await;
        assert_eq!(ack["pending"], true, "expected a pending ack, got {ack}");
        ack["operationId"].as_str().unwrap().parse().unwrap()
    }

    pub fn events(&self) -> broadcast::Receiver<ToolEvent> {
        self.ctx.subscribe().unwrap()
    }
}
