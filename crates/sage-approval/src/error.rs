use serde::{Deserialize, Serialize};
use std::fmt;

use sage_vault::VaultError;

/// Stable names for executor failure kinds, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown operation id, or the referenced vault entry is missing.
    NotFound,
    /// A human declined the operation.
    Rejected,
    /// No decision arrived within the approval bound.
    Timeout,
    /// A required argument (the target path) is missing.
    InvalidArgument,
    /// The operation type is not recognized.
    Unsupported,
    /// The vault call itself failed.
    ExecutionFailed,
}

impl ErrorKind {
    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::Rejected => "Rejected",
            Self::Timeout => "Timeout",
            Self::InvalidArgument => "InvalidArgument",
            Self::Unsupported => "Unsupported",
            Self::ExecutionFailed => "ExecutionFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation did not complete.
///
/// `Clone` so a single dispatch outcome can be handed to every caller that
/// awaited the same operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// Operation or vault entry not found.
    #[error("not found: {message}")]
    NotFound {
        /// What was missing.
        message: String,
    },

    /// Declined by the user.
    #[error("operation rejected: {message}")]
    Rejected {
        /// Human-readable detail.
        message: String,
    },

    /// The approval wait expired.
    #[error("approval timeout after {timeout_ms}ms")]
    Timeout {
        /// Bound that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// Missing or malformed argument.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Which argument and why.
        message: String,
    },

    /// Unknown operation type.
    #[error("unsupported operation: {message}")]
    Unsupported {
        /// The unrecognized type.
        message: String,
    },

    /// The vault backend returned an error.
    #[error("execution failed: {message}")]
    ExecutionFailed {
        /// Underlying backend message.
        message: String,
    },
}

impl OperationError {
    /// Stable kind of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
        }
    }

    /// Human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::Rejected { message }
            | Self::InvalidArgument { message }
            | Self::Unsupported { message }
            | Self::ExecutionFailed { message } => message.clone(),
            Self::Timeout { timeout_ms } => {
                format!("The operation timed out after {timeout_ms}ms waiting for user approval")
            },
        }
    }

    /// Uniform failure payload: `{"success": false, "error": <kind>, "message": ...}`.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "error": self.kind().as_str(),
            "message": self.message(),
        })
    }

    pub(crate) fn rejected() -> Self {
        Self::Rejected {
            message: "The operation was rejected by the user".to_string(),
        }
    }
}

impl From<VaultError> for OperationError {
    fn from(e: VaultError) -> Self {
        Self::ExecutionFailed {
            message: e.to_string(),
        }
    }
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let err = OperationError::InvalidArgument {
            message: "Target path is required for move operations".to_string(),
        };
        let payload = err.to_payload();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "InvalidArgument");
        assert_eq!(
            payload["message"],
            "Target path is required for move operations"
        );
    }

    #[test]
    fn test_vault_error_maps_to_execution_failed() {
        let err: OperationError = VaultError::NotEmpty("Notes".into()).into();
        assert_eq!(err.kind(), ErrorKind::ExecutionFailed);
        assert!(err.message().contains("Notes"));
    }

    #[test]
    fn test_timeout_message() {
        let err = OperationError::Timeout { timeout_ms: 120_000 };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.message().contains("120000ms"));
        assert_eq!(err.to_string(), "approval timeout after 120000ms");
    }
}
