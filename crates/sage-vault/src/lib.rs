//! Sage vault backends.
//!
//! Provides the narrow file/folder capability the assistant needs from a
//! document vault, plus two implementations: an in-memory tree for tests and
//! embedding, and a host-directory backend sandboxed to a vault root.
//!
//! All paths crossing this API are vault-relative, `/`-separated, and carry no
//! leading slash; see [`path::normalize`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Vault error types.
pub mod error;
/// Host-directory vault implementation.
pub mod host;
/// In-memory vault implementation.
pub mod memory;
/// Vault path normalization and sandboxing utilities.
pub mod path;

pub use error::{VaultError, VaultResult};
pub use host::HostVault;
pub use memory::MemoryVault;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Whether a vault entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file (notes, attachments).
    File,
    /// A folder.
    Folder,
}

/// A resolved file or folder in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultEntry {
    /// Normalized vault-relative path (`""` for the root folder).
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
}

impl VaultEntry {
    /// Create a file entry.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a folder entry.
    #[must_use]
    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Folder,
        }
    }

    /// True if this entry is a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// True if this entry is a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Final path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        path::file_name(&self.path)
    }

    /// File extension without the dot, empty for folders and extensionless files.
    #[must_use]
    pub fn extension(&self) -> &str {
        if self.is_folder() {
            return "";
        }
        self.name()
            .rsplit_once('.')
            .map_or("", |(stem, ext)| if stem.is_empty() { "" } else { ext })
    }

    /// Parent folder path.
    #[must_use]
    pub fn parent(&self) -> &str {
        path::parent(&self.path)
    }

    /// True for markdown notes.
    #[must_use]
    pub fn is_markdown(&self) -> bool {
        self.is_file() && self.extension().eq_ignore_ascii_case("md")
    }
}

/// File and folder capability consumed by the approval executor and the agent tools.
///
/// Lookups are total (`None` for anything missing or unresolvable); mutations
/// are fallible and may fail on I/O.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Resolve any entry at `path`.
    async fn find_entry(&self, path: &str) -> Option<VaultEntry>;

    /// Resolve a file at `path`. Folders resolve to `None`.
    async fn find_file(&self, path: &str) -> Option<VaultEntry> {
        self.find_entry(path).await.filter(VaultEntry::is_file)
    }

    /// Resolve a folder at `path`. Files resolve to `None`.
    async fn find_folder(&self, path: &str) -> Option<VaultEntry> {
        self.find_entry(path).await.filter(VaultEntry::is_folder)
    }

    /// Rename or move an entry. Missing parent folders of `new_path` are created.
    async fn rename(&self, entry: &VaultEntry, new_path: &str) -> VaultResult<()>;

    /// Delete an entry. Folders with children require `recursive`.
    async fn delete(&self, entry: &VaultEntry, recursive: bool) -> VaultResult<()>;

    /// Create a folder (and any missing ancestors).
    async fn create_folder(&self, path: &str) -> VaultResult<()>;

    /// Read a file as UTF-8 text.
    async fn read(&self, entry: &VaultEntry) -> VaultResult<String>;

    /// Create or overwrite a file. The parent folder must exist.
    async fn write(&self, path: &str, content: &str) -> VaultResult<()>;

    /// Direct children of a folder.
    async fn list(&self, folder: &str) -> VaultResult<Vec<VaultEntry>>;

    /// Every markdown file in the vault.
    async fn markdown_files(&self) -> VaultResult<Vec<VaultEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_helpers() {
        let entry = VaultEntry::file("Notes/daily/2024-01-01.md");
        assert_eq!(entry.name(), "2024-01-01.md");
        assert_eq!(entry.extension(), "md");
        assert_eq!(entry.parent(), "Notes/daily");
        assert!(entry.is_markdown());

        let folder = VaultEntry::folder("Notes");
        assert_eq!(folder.extension(), "");
        assert!(!folder.is_markdown());

        assert_eq!(VaultEntry::file(".gitignore").extension(), "");
    }
}
