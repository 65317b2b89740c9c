//! Operation manager: the single entry point for gated vault mutations.
//!
//! The [`OperationManager`] ties the [`OperationRegistry`] to an
//! [`OperationExecutor`]:
//!
//! 1. A tool submits a [`PendingOperation`]; it is registered and an
//!    execution is spawned in the background.
//! 2. The background execution waits for a decision (bounded).
//! 3. A UI calls [`approve`](OperationManager::approve) or
//!    [`reject`](OperationManager::reject) with the operation id.
//! 4. On approval the vault is mutated exactly once; the settlement is logged.
//! 5. Resolved records stay visible until [`clear_resolved`](OperationManager::clear_resolved).

use std::sync::Arc;

use sage_vault::Vault;
use tokio::task::JoinHandle;

use crate::executor::{ExecutorConfig, OperationExecutor};
use crate::operation::{OperationId, PendingOperation};
use crate::outcome::OperationResult;
use crate::registry::OperationRegistry;

/// Facade over the registry and executor of one session.
#[derive(Debug, Clone)]
pub struct OperationManager {
    registry: Arc<OperationRegistry>,
    executor: Arc<OperationExecutor>,
}

impl OperationManager {
    /// Create a manager with a fresh registry over `vault`.
    #[must_use]
    pub fn new(vault: Arc<dyn Vault>, config: ExecutorConfig) -> Self {
        Self::with_registry(Arc::new(OperationRegistry::new()), vault, config)
    }

    /// Create a manager over an existing registry.
    #[must_use]
    pub fn with_registry(
        registry: Arc<OperationRegistry>,
        vault: Arc<dyn Vault>,
        config: ExecutorConfig,
    ) -> Self {
        let executor = Arc::new(OperationExecutor::new(
            Arc::clone(&registry),
            vault,
            config,
        ));
        Self { registry, executor }
    }

    /// Register an operation and start waiting on it in the background.
    ///
    /// Without a reachable runtime the operation is only registered; it can
    /// be driven later with [`execute`](Self::execute).
    pub fn submit(&self, op: PendingOperation) -> OperationId {
        let id = self.registry.add(op);
        drop(self.executor.spawn(id));
        id
    }

    /// Approve an operation.
    ///
    /// When this call records the decision, an execution is spawned so the
    /// mutation happens even if no submit-time waiter remains (for example
    /// after it timed out). Safe to call from a thread outside the runtime.
    /// Returns whether the decision was new.
    pub fn approve(&self, id: &OperationId) -> bool {
        let decided = self.registry.approve(id);
        if decided {
            drop(self.executor.spawn(*id));
        }
        decided
    }

    /// Reject an operation. The vault is never touched for it.
    pub fn reject(&self, id: &OperationId) -> bool {
        self.registry.reject(id)
    }

    /// Snapshot of one operation.
    #[must_use]
    pub fn get(&self, id: &OperationId) -> Option<PendingOperation> {
        self.registry.get(id)
    }

    /// Snapshot of every operation, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<PendingOperation> {
        self.registry.all()
    }

    /// Snapshot of the undecided operations, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingOperation> {
        self.registry.pending()
    }

    /// Prune decided operations.
    pub fn clear_resolved(&self) -> usize {
        self.registry.clear_resolved()
    }

    /// Drive an operation to settlement and return the result.
    pub async fn execute(&self, id: &OperationId) -> OperationResult {
        self.executor.execute(id).await
    }

    /// Spawn an execution and hand back its handle, if a runtime is reachable.
    pub fn spawn(&self, id: OperationId) -> Option<JoinHandle<OperationResult>> {
        self.executor.spawn(id)
    }

    /// The shared registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// The shared executor.
    #[must_use]
    pub fn executor(&self) -> &Arc<OperationExecutor> {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use sage_vault::MemoryVault;
    use std::time::Duration;

    fn manager(vault: &Arc<MemoryVault>) -> OperationManager {
        OperationManager::new(
            Arc::clone(vault) as Arc<dyn Vault>,
            ExecutorConfig::default()
                .with_approval_timeout(Duration::from_secs(5))
                .with_poll_interval(Duration::from_millis(50)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_then_approve_mutates_vault() {
        let vault = Arc::new(MemoryVault::with_files([("Inbox/todo.md", "- [ ] x")]));
        let manager = manager(&vault);

        let id = manager.submit(PendingOperation::delete("Inbox/todo.md"));
        assert_eq!(manager.pending().len(), 1);

        assert!(manager.approve(&id));
        let result = manager.execute(&id).await.unwrap();
        assert_eq!(result.message, "File \"Inbox/todo.md\" successfully deleted");
        assert!(vault.find_entry("Inbox/todo.md").await.is_none());
        assert!(manager.pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_approve_is_ignored() {
        let vault = Arc::new(MemoryVault::with_files([("a.md", "")]));
        let manager = manager(&vault);
        let id = manager.submit(PendingOperation::rename("a.md", "b.md"));

        assert!(manager.approve(&id));
        assert!(!manager.approve(&id));
        assert!(!manager.reject(&id));
        assert!(manager.execute(&id).await.is_ok());
        assert!(vault.find_file("b.md").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reject_leaves_vault_untouched() {
        let vault = Arc::new(MemoryVault::with_files([("keep.md", "x")]));
        let manager = manager(&vault);
        let id = manager.submit(PendingOperation::delete("keep.md"));

        assert!(manager.reject(&id));
        let err = manager.execute(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert!(vault.find_file("keep.md").await.is_some());
        assert_eq!(manager.clear_resolved(), 1);
        assert!(manager.get(&id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_approve_after_timeout_still_executes() {
        let vault = Arc::new(MemoryVault::new());
        let manager = manager(&vault);
        let id = manager.submit(PendingOperation::create_folder("Late"));

        // Let the submit-time waiter give up.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(vault.find_folder("Late").await.is_none());

        assert!(manager.approve(&id));
        let handle = manager.spawn(id).unwrap();
        assert!(handle.await.unwrap().is_ok());
        assert!(vault.find_folder("Late").await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let vault = Arc::new(MemoryVault::new());
        let manager = manager(&vault);
        let id = OperationId::new();
        assert!(!manager.approve(&id));
        assert!(manager.get(&id).is_none());
        let err = manager.execute(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_approve_from_plain_thread() {
        let vault = Arc::new(MemoryVault::with_files([("Inbox/old.md", "x")]));
        let manager = manager(&vault);
        let id = manager.submit(PendingOperation::delete("Inbox/old.md"));

        let approver = manager.clone();
        let decided = std::thread::spawn(move || approver.approve(&id))
            .join()
            .unwrap();
        assert!(decided);

        let result = manager.execute(&id).await.unwrap();
        assert_eq!(result.message, "File \"Inbox/old.md\" successfully deleted");
        assert!(vault.find_entry("Inbox/old.md").await.is_none());
    }

    #[test]
    fn test_approve_without_runtime_can_be_driven_later() {
        let vault = Arc::new(MemoryVault::with_files([("Inbox/old.md", "x")]));
        let manager = manager(&vault);
        let id = manager.submit(PendingOperation::delete("Inbox/old.md"));

        assert!(manager.approve(&id));
        assert!(manager.get(&id).unwrap().approved);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            assert!(vault.find_file("Inbox/old.md").await.is_some());
            assert!(manager.execute(&id).await.is_ok());
            assert!(vault.find_entry("Inbox/old.md").await.is_none());
        });
    }
}
