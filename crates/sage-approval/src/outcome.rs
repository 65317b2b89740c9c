//! Uniform result of one executor run.

use serde::{Deserialize, Serialize};

use crate::error::{ApprovalResult, OperationError};

/// A completed vault mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSuccess {
    /// What was done, echoing the paths involved.
    pub message: String,
}

impl OperationSuccess {
    /// Create a success with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Uniform success payload: `{"success": true, "data": {"message": ...}}`.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "success": true,
            "data": { "message": self.message },
        })
    }
}

/// Settlement of an executor run. Never an exception, always one of these.
pub type OperationResult = ApprovalResult<OperationSuccess>;

/// Render either side of an [`OperationResult`] as its uniform JSON payload.
#[must_use]
pub fn to_payload(result: &OperationResult) -> serde_json::Value {
    match result {
        Ok(success) => success.to_payload(),
        Err(error) => error.to_payload(),
    }
}

impl From<OperationSuccess> for serde_json::Value {
    fn from(success: OperationSuccess) -> Self {
        success.to_payload()
    }
}

impl From<OperationError> for serde_json::Value {
    fn from(error: OperationError) -> Self {
        error.to_payload()
    }
}
