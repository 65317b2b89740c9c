use thiserror::Error;

/// Vault backend errors.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Path escapes the vault root.
    #[error("Path resolves outside the vault: {0}")]
    SandboxViolation(String),

    /// Missing file or folder.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Destination already taken.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Folder operation on a file.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Non-recursive delete of a folder that still has children.
    #[error("Folder is not empty: {0}")]
    NotEmpty(String),

    /// Native IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;
