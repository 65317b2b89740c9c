//! Waits for a decision on a pending operation, then performs it.
//!
//! The executor is the only place that mutates the vault on behalf of a
//! gated tool. Every run settles into an [`OperationResult`]; the vault is
//! touched only after an approval, and at most once per operation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sage_vault::{Vault, VaultEntry};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{ApprovalResult, OperationError};
use crate::operation::{OperationId, OperationKind, PendingOperation};
use crate::outcome::{OperationResult, OperationSuccess};
use crate::registry::OperationRegistry;

/// Default bound on the approval wait.
pub const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(120);

/// Default interval between registry re-reads while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Timing configuration for the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// How long one `execute` call waits for a decision.
    pub approval_timeout: Duration,
    /// Fallback re-read interval while waiting.
    pub poll_interval: Duration,
}

impl ExecutorConfig {
    /// Set the approval timeout.
    #[must_use]
    pub fn with_approval_timeout(mut self, timeout: Duration) -> Self {
        self.approval_timeout = timeout;
        self
    }

    /// Set the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            approval_timeout: DEFAULT_APPROVAL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What one dispatch attempt produced.
///
/// `Err` is a pre-check refusal raised before the vault was touched; it is
/// returned to the caller but not remembered, so a later call can retry.
type Attempt = Result<OperationResult, OperationError>;

/// Runs approved operations against a [`Vault`].
pub struct OperationExecutor {
    registry: Arc<OperationRegistry>,
    vault: Arc<dyn Vault>,
    config: ExecutorConfig,
    /// Runtime the executor was built on, used when spawning from a thread
    /// that has none.
    runtime: Option<Handle>,
}

impl OperationExecutor {
    /// Create an executor over a registry and a vault.
    #[must_use]
    pub fn new(
        registry: Arc<OperationRegistry>,
        vault: Arc<dyn Vault>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            vault,
            config,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Timing configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Drive one operation to settlement.
    ///
    /// An undecided operation is waited on for at most
    /// [`ExecutorConfig::approval_timeout`], counted from this call. Once
    /// approved, the mutation runs through a per-operation cell so that
    /// concurrent or repeated calls share a single vault mutation and
    /// observe the same result.
    ///
    /// Failures found before the vault is mutated (a missing source, a
    /// missing target path) are not stored: the next call checks again.
    pub async fn execute(&self, id: &OperationId) -> OperationResult {
        let Some((op, _)) = self.registry.lookup(id) else {
            return Err(OperationError::NotFound {
                message: format!("No operation found with ID {}", id.0),
            });
        };
        if op.rejected {
            return Err(OperationError::rejected());
        }
        if !op.approved {
            self.wait_for_decision(id).await?;
        }

        // Re-read: the record may have been rejected or pruned meanwhile.
        let Some((op, outcome)) = self.registry.lookup(id) else {
            return Err(OperationError::rejected());
        };
        if !op.approved {
            return Err(OperationError::rejected());
        }

        outcome
            .get_or_try_init(|| self.dispatch(&op))
            .await
            .and_then(Clone::clone)
    }

    /// Run [`execute`](Self::execute) in the background and log how it
    /// settled.
    ///
    /// Uses the caller's runtime, falling back to the one the executor was
    /// built on. Returns `None` when neither is available; the operation
    /// keeps its decision and can still be driven with `execute`.
    pub fn spawn(self: &Arc<Self>, id: OperationId) -> Option<JoinHandle<OperationResult>> {
        let Some(runtime) = Handle::try_current().ok().or_else(|| self.runtime.clone()) else {
            tracing::warn!(operation_id = %id, "No tokio runtime available, execution not started");
            return None;
        };
        let executor = Arc::clone(self);
        Some(runtime.spawn(async move {
            let result = executor.execute(&id).await;
            match &result {
                Ok(success) => {
                    tracing::info!(operation_id = %id, message = %success.message, "Operation completed");
                },
                Err(e) => {
                    tracing::warn!(operation_id = %id, error = %e, "Operation did not complete");
                },
            }
            result
        }))
    }

    /// Block until the operation is decided, disappears, or the bound passes.
    ///
    /// Returns `Ok` once a decision is recorded; the caller re-reads it.
    async fn wait_for_decision(&self, id: &OperationId) -> ApprovalResult<()> {
        let mut decisions = self.registry.subscribe();
        let deadline = Instant::now().checked_add(self.config.approval_timeout);
        tracing::debug!(operation_id = %id, "Waiting for approval");

        loop {
            match self.registry.get(id) {
                None => return Err(OperationError::rejected()),
                Some(op) if op.is_decided() => return Ok(()),
                Some(_) => {},
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                let timeout_ms =
                    u64::try_from(self.config.approval_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation_id = %id, timeout_ms, "Approval timed out");
                return Err(OperationError::Timeout { timeout_ms });
            }

            tokio::select! {
                changed = decisions.changed() => {
                    if changed.is_err() {
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                },
                () = tokio::time::sleep(self.config.poll_interval) => {},
                () = sleep_until_deadline(deadline) => {},
            }
        }
    }

    async fn dispatch(&self, op: &PendingOperation) -> Attempt {
        tracing::debug!(
            operation_id = %op.id,
            kind = %op.kind,
            source = %op.source_path,
            target = ?op.target_path,
            "Executing approved operation"
        );
        let mutation = match op.kind {
            OperationKind::Rename | OperationKind::Move => {
                let target = required_target(op)?;
                let file = self.existing_file(op).await?;
                self.vault.rename(&file, target).await
            },
            OperationKind::Delete => {
                let file = self.existing_file(op).await?;
                self.vault.delete(&file, false).await
            },
            OperationKind::CreateFolder => self.vault.create_folder(&op.source_path).await,
            OperationKind::DeleteFolder => {
                let entry = self
                    .vault
                    .find_entry(&op.source_path)
                    .await
                    .ok_or_else(|| folder_not_found(op))?;
                self.vault.delete(&entry, true).await
            },
            OperationKind::MoveFolder => {
                let target = required_target(op)?;
                let folder = self
                    .vault
                    .find_folder(&op.source_path)
                    .await
                    .ok_or_else(|| folder_not_found(op))?;
                self.vault.rename(&folder, target).await
            },
        };
        Ok(mutation
            .map(|()| success(op))
            .map_err(OperationError::from))
    }

    async fn existing_file(&self, op: &PendingOperation) -> ApprovalResult<VaultEntry> {
        self.vault
            .find_file(&op.source_path)
            .await
            .ok_or_else(|| file_not_found(op))
    }
}

impl fmt::Debug for OperationExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationExecutor")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn required_target(op: &PendingOperation) -> ApprovalResult<&str> {
    op.target_path
        .as_deref()
        .filter(|target| !target.trim().is_empty())
        .ok_or_else(|| OperationError::InvalidArgument {
            message: format!("Target path is required for {} operations", op.kind),
        })
}

fn success(op: &PendingOperation) -> OperationSuccess {
    let source = &op.source_path;
    let target = op.target_path.as_deref().unwrap_or_default();
    OperationSuccess::new(match op.kind {
        OperationKind::Rename => {
            format!("File successfully renamed from \"{source}\" to \"{target}\"")
        },
        OperationKind::Move => format!("File successfully moved from \"{source}\" to \"{target}\""),
        OperationKind::Delete => format!("File \"{source}\" successfully deleted"),
        OperationKind::CreateFolder => format!("Folder \"{source}\" successfully created"),
        OperationKind::DeleteFolder => format!("Folder \"{source}\" successfully deleted"),
        OperationKind::MoveFolder => {
            format!("Folder successfully moved from \"{source}\" to \"{target}\"")
        },
    })
}

fn file_not_found(op: &PendingOperation) -> OperationError {
    OperationError::NotFound {
        message: format!("File \"{}\" not found", op.source_path),
    }
}

fn folder_not_found(op: &PendingOperation) -> OperationError {
    OperationError::NotFound {
        message: format!("Folder \"{}\" not found", op.source_path),
    }
}
