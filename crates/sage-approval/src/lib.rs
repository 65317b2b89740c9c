//! Sage Approval - human-in-the-loop gating of vault mutations.
//!
//! Agent tools never rename, move or delete anything in the vault directly.
//! They register a [`PendingOperation`] and return immediately; the
//! operation is carried out only after a person approves it.
//!
//! - [`OperationRegistry`]: the session's store of operations and decisions
//! - [`OperationExecutor`]: waits (bounded) for a decision, then performs
//!   the mutation once
//! - [`OperationManager`]: facade used by tools and approval UIs
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sage_approval::{ExecutorConfig, OperationManager, PendingOperation};
//! use sage_vault::MemoryVault;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let vault = Arc::new(MemoryVault::with_files([("Notes/draft.md", "wip")]));
//! let manager = OperationManager::new(vault, ExecutorConfig::default());
//!
//! let id = manager.submit(PendingOperation::rename("Notes/draft.md", "Notes/final.md"));
//! assert!(manager.approve(&id));
//!
//! let done = manager.execute(&id).await.unwrap();
//! assert!(done.message.contains("Notes/final.md"));
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

/// Error types and results for gated operations.
pub mod error;
pub mod executor;
pub mod manager;
pub mod operation;
pub mod outcome;
pub mod registry;

pub use error::{ApprovalResult, ErrorKind, OperationError};
pub use executor::{ExecutorConfig, OperationExecutor};
pub use manager::OperationManager;
pub use operation::{OperationId, OperationKind, OperationStatus, PendingOperation};
pub use outcome::{OperationResult, OperationSuccess};
pub use registry::OperationRegistry;
