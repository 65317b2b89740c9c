use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::path::{normalize, parent, resolve_path};
use crate::{Vault, VaultEntry, VaultError, VaultResult};

/// Maximum file size read into memory.
const MAX_READ_BYTES: u64 = 50 * 1024 * 1024;

/// A [`Vault`] backed by a directory on the host filesystem.
///
/// Paths are resolved beneath the canonical root; a path that passes
/// through a symlink is refused and hidden entries (`.obsidian`, `.git`,
/// ...) are left out of listings.
#[derive(Debug, Clone)]
pub struct HostVault {
    root: PathBuf,
}

impl HostVault {
    /// Create a vault rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Physical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault path to its physical location.
    ///
    /// The path is joined onto the canonical root and every prefix of it that
    /// exists on disk must be a real file or folder. A symlink anywhere along
    /// the way is a sandbox violation.
    async fn resolve(&self, path: &str) -> VaultResult<(String, PathBuf)> {
        let normalized = normalize(path)?;
        let canonical_root = tokio::fs::canonicalize(&self.root)
            .await
            .unwrap_or_else(|_| self.root.clone());
        let physical = resolve_path(&canonical_root, &normalized)?;

        let mut segments: Vec<&Path> = physical
            .ancestors()
            .take_while(|p| *p != canonical_root.as_path())
            .collect();
        segments.reverse();
        for segment in segments {
            match tokio::fs::symlink_metadata(segment).await {
                Ok(meta) if meta.is_symlink() => {
                    tracing::debug!(path = %normalized, "refusing path through symlink");
                    return Err(VaultError::SandboxViolation(format!(
                        "symlinks are not followed: {normalized}"
                    )));
                },
                Ok(_) => {},
                Err(_) => break,
            }
        }
        Ok((normalized, physical))
    }

    async fn entry_at(&self, normalized: &str, physical: &Path) -> Option<VaultEntry> {
        let meta = tokio::fs::symlink_metadata(physical).await.ok()?;
        if meta.is_symlink() {
            tracing::debug!(path = normalized, "ignoring symlink in vault");
            return None;
        }
        if meta.is_dir() {
            Some(VaultEntry::folder(normalized))
        } else if meta.is_file() {
            Some(VaultEntry::file(normalized))
        } else {
            None
        }
    }

    fn to_vault_path(&self, physical: &Path) -> Option<String> {
        let rel = physical.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }
}

fn io_error(path: &str, e: io::Error) -> VaultError {
    if e.kind() == io::ErrorKind::NotFound {
        VaultError::NotFound(path.to_string())
    } else {
        VaultError::Io(e)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[async_trait]
impl Vault for HostVault {
    async fn find_entry(&self, path: &str) -> Option<VaultEntry> {
        let (normalized, physical) = self.resolve(path).await.ok()?;
        self.entry_at(&normalized, &physical).await
    }

    async fn rename(&self, entry: &VaultEntry, new_path: &str) -> VaultResult<()> {
        let (from, from_physical) = self.resolve(&entry.path).await?;
        let (to, to_physical) = self.resolve(new_path).await?;
        if from.is_empty() || to.is_empty() {
            return Err(VaultError::SandboxViolation(
                "cannot rename the vault root".into(),
            ));
        }
        match self.entry_at(&from, &from_physical).await {
            Some(found) if found.kind == entry.kind => {},
            _ => return Err(VaultError::NotFound(from)),
        }
        if tokio::fs::symlink_metadata(&to_physical).await.is_ok() {
            return Err(VaultError::AlreadyExists(to));
        }
        if let Some(dir) = to_physical.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| io_error(parent(&to), e))?;
        }
        tokio::fs::rename(&from_physical, &to_physical)
            .await
            .map_err(|e| io_error(&from, e))
    }

    async fn delete(&self, entry: &VaultEntry, recursive: bool) -> VaultResult<()> {
        let (path, physical) = self.resolve(&entry.path).await?;
        if path.is_empty() {
            return Err(VaultError::SandboxViolation(
                "cannot delete the vault root".into(),
            ));
        }
        let Some(found) = self.entry_at(&path, &physical).await else {
            return Err(VaultError::NotFound(path));
        };
        if found.is_file() {
            return tokio::fs::remove_file(&physical)
                .await
                .map_err(|e| io_error(&path, e));
        }
        if recursive {
            return tokio::fs::remove_dir_all(&physical)
                .await
                .map_err(|e| io_error(&path, e));
        }
        let mut children = tokio::fs::read_dir(&physical)
            .await
            .map_err(|e| io_error(&path, e))?;
        if children
            .next_entry()
            .await
            .map_err(|e| io_error(&path, e))?
            .is_some()
        {
            return Err(VaultError::NotEmpty(path));
        }
        tokio::fs::remove_dir(&physical)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn create_folder(&self, path: &str) -> VaultResult<()> {
        let (path, physical) = self.resolve(path).await?;
        if path.is_empty() || tokio::fs::symlink_metadata(&physical).await.is_ok() {
            return Err(VaultError::AlreadyExists(path));
        }
        tokio::fs::create_dir_all(&physical).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotADirectory {
                VaultError::NotADirectory(path.clone())
            } else {
                VaultError::Io(e)
            }
        })
    }

    async fn read(&self, entry: &VaultEntry) -> VaultResult<String> {
        let (path, physical) = self.resolve(&entry.path).await?;
        let Some(found) = self.entry_at(&path, &physical).await else {
            return Err(VaultError::NotFound(path));
        };
        if !found.is_file() {
            return Err(VaultError::NotFound(path));
        }
        let meta = tokio::fs::metadata(&physical)
            .await
            .map_err(|e| io_error(&path, e))?;
        if meta.len() > MAX_READ_BYTES {
            return Err(VaultError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{path} is too large to read into memory (> 50MB)"),
            )));
        }
        tokio::fs::read_to_string(&physical)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn write(&self, path: &str, content: &str) -> VaultResult<()> {
        let (path, physical) = self.resolve(path).await?;
        let folder = parent(&path).to_string();
        if !folder.is_empty() && self.find_folder(&folder).await.is_none() {
            return Err(VaultError::NotFound(folder));
        }
        match self.entry_at(&path, &physical).await {
            Some(existing) if existing.is_folder() => {
                return Err(VaultError::AlreadyExists(path));
            },
            _ => {},
        }
        if path.is_empty() {
            return Err(VaultError::AlreadyExists(path));
        }
        tokio::fs::write(&physical, content)
            .await
            .map_err(|e| io_error(&path, e))
    }

    async fn list(&self, folder: &str) -> VaultResult<Vec<VaultEntry>> {
        let (folder, physical) = self.resolve(folder).await?;
        if self.entry_at(&folder, &physical).await.is_none_or(|e| !e.is_folder()) {
            return Err(VaultError::NotFound(folder));
        }

        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&physical)
            .await
            .map_err(|e| io_error(&folder, e))?;
        while let Some(child) = read_dir
            .next_entry()
            .await
            .map_err(|e| io_error(&folder, e))?
        {
            let name = child.file_name().to_string_lossy().into_owned();
            if is_hidden(&name) {
                continue;
            }
            let path = if folder.is_empty() {
                name
            } else {
                format!("{folder}/{name}")
            };
            if let Some(entry) = self.entry_at(&path, &child.path()).await {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn markdown_files(&self) -> VaultResult<Vec<VaultEntry>> {
        let root = self.root.clone();
        let vault = self.clone();
        let files = tokio::task::spawn_blocking(move || {
            WalkDir::new(&root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()))
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| vault.to_vault_path(e.path()))
                .map(VaultEntry::file)
                .filter(VaultEntry::is_markdown)
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| VaultError::Io(io::Error::other(e)))?;
        Ok(files)
    }
}
