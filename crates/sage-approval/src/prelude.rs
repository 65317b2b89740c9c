//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sage_approval::prelude::*;` to import all essential types.

pub use crate::{
    ApprovalResult, ErrorKind, ExecutorConfig, OperationError, OperationExecutor, OperationId,
    OperationKind, OperationManager, OperationRegistry, OperationResult, OperationStatus,
    OperationSuccess, PendingOperation,
};
