//! Pending vault operations.
//!
//! A [`PendingOperation`] is one agent-requested mutation of the vault,
//! waiting for (or carrying) a human decision. Everything but the two
//! decision flags is fixed at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::OperationError;

/// Unique identifier for a pending operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(pub Uuid);

impl OperationId {
    /// Create a new random operation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op:{}", self.0)
    }
}

impl FromStr for OperationId {
    type Err = uuid::Error;

    /// Accepts both the `op:<uuid>` display form and a bare UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix("op:").unwrap_or(raw);
        Uuid::parse_str(raw).map(Self)
    }
}

/// The closed set of mutations that require approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    /// Rename a file.
    Rename,
    /// Delete a file.
    Delete,
    /// Move a file to another folder.
    Move,
    /// Create a folder.
    CreateFolder,
    /// Delete a folder and everything under it.
    DeleteFolder,
    /// Move a folder.
    MoveFolder,
}

impl OperationKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Rename,
        Self::Delete,
        Self::Move,
        Self::CreateFolder,
        Self::DeleteFolder,
        Self::MoveFolder,
    ];

    /// Wire name (`rename`, `createFolder`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::CreateFolder => "createFolder",
            Self::DeleteFolder => "deleteFolder",
            Self::MoveFolder => "moveFolder",
        }
    }

    /// Whether this kind needs a target path.
    #[must_use]
    pub fn requires_target(self) -> bool {
        matches!(self, Self::Rename | Self::Move | Self::MoveFolder)
    }

    /// Whether this kind acts on a folder rather than a file.
    #[must_use]
    pub fn is_folder_operation(self) -> bool {
        matches!(
            self,
            Self::CreateFolder | Self::DeleteFolder | Self::MoveFolder
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| OperationError::Unsupported {
                message: format!("Operation type \"{s}\" is not supported"),
            })
    }
}

/// Decision state of a pending operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by the user.
    Approved,
    /// Rejected by the user.
    Rejected,
}

/// One requested vault mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOperation {
    /// Unique identifier.
    pub id: OperationId,
    /// What to do.
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Vault path the operation acts on.
    pub source_path: String,
    /// Destination, for rename/move kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    /// Summary shown to the approver.
    pub description: String,
    /// Set once by an approval.
    pub approved: bool,
    /// Set once by a rejection.
    pub rejected: bool,
    /// When the operation was requested.
    pub created_at: DateTime<Utc>,
}

impl PendingOperation {
    /// Create an undecided operation with a fresh id and a synthesized description.
    #[must_use]
    pub fn new(
        kind: OperationKind,
        source_path: impl Into<String>,
        target_path: Option<String>,
    ) -> Self {
        let source_path = source_path.into();
        let description = describe(kind, &source_path, target_path.as_deref());
        Self {
            id: OperationId::new(),
            kind,
            source_path,
            target_path,
            description,
            approved: false,
            rejected: false,
            created_at: Utc::now(),
        }
    }

    /// Rename a file.
    #[must_use]
    pub fn rename(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self::new(OperationKind::Rename, old_path, Some(new_path.into()))
    }

    /// Delete a file.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(OperationKind::Delete, path, None)
    }

    /// Move a file.
    #[must_use]
    pub fn move_file(source_path: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self::new(OperationKind::Move, source_path, Some(target_path.into()))
    }

    /// Create a folder.
    #[must_use]
    pub fn create_folder(path: impl Into<String>) -> Self {
        Self::new(OperationKind::CreateFolder, path, None)
    }

    /// Delete a folder recursively.
    #[must_use]
    pub fn delete_folder(path: impl Into<String>) -> Self {
        Self::new(OperationKind::DeleteFolder, path, None)
    }

    /// Move a folder.
    #[must_use]
    pub fn move_folder(source_path: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self::new(OperationKind::MoveFolder, source_path, Some(target_path.into()))
    }

    /// Replace the synthesized description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Current decision state.
    #[must_use]
    pub fn status(&self) -> OperationStatus {
        if self.approved {
            OperationStatus::Approved
        } else if self.rejected {
            OperationStatus::Rejected
        } else {
            OperationStatus::Pending
        }
    }

    /// True once approved or rejected.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.approved || self.rejected
    }
}

fn describe(kind: OperationKind, source: &str, target: Option<&str>) -> String {
    let target = target.unwrap_or("<no target>");
    match kind {
        OperationKind::Rename => format!("Rename file from \"{source}\" to \"{target}\""),
        OperationKind::Delete => format!("Delete file \"{source}\""),
        OperationKind::Move => format!("Move file from \"{source}\" to \"{target}\""),
        OperationKind::CreateFolder => format!("Create folder \"{source}\""),
        OperationKind::DeleteFolder => format!("Delete folder \"{source}\""),
        OperationKind::MoveFolder => format!("Move folder from \"{source}\" to \"{target}\""),
    }
}
