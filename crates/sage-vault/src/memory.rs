use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::path::{is_within, normalize, parent};
use crate::{EntryKind, Vault, VaultEntry, VaultError, VaultResult};

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Folder,
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Folder => EntryKind::Folder,
        }
    }
}

/// An in-memory vault keyed by normalized path.
///
/// The root folder (`""`) is implicit. Thread-safe via internal [`RwLock`];
/// no lock is held across an await point.
///
/// # Example
///
/// ```
/// use sage_vault::MemoryVault;
///
/// let vault = MemoryVault::with_files([("Notes/a.md", "# A")]);
/// assert_eq!(vault.len(), 2); // "Notes" folder + "Notes/a.md"
/// ```
#[derive(Debug, Default)]
pub struct MemoryVault {
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl MemoryVault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault pre-populated with files. Parent folders are created
    /// implicitly; unnormalizable paths are skipped.
    #[must_use]
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let vault = Self::new();
        {
            let mut nodes = vault.write_nodes();
            for (path, content) in files {
                let Ok(path) = normalize(path.as_ref()) else {
                    tracing::warn!(path = path.as_ref(), "skipping invalid seed path");
                    continue;
                };
                insert_ancestors(&mut nodes, parent(&path));
                nodes.insert(path, Node::File(content.into()));
            }
        }
        vault
    }

    /// Number of entries, excluding the implicit root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_nodes().len()
    }

    /// True if the vault holds no entries besides the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_nodes().is_empty()
    }

    fn read_nodes(&self) -> RwLockReadGuard<'_, BTreeMap<String, Node>> {
        self.nodes.read().unwrap_or_else(|e| {
            tracing::warn!("MemoryVault read lock poisoned, recovering");
            e.into_inner()
        })
    }

    fn write_nodes(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Node>> {
        self.nodes.write().unwrap_or_else(|e| {
            tracing::warn!("MemoryVault write lock poisoned, recovering");
            e.into_inner()
        })
    }
}

/// Insert `folder` and every ancestor as folders. Existing nodes are left alone.
fn insert_ancestors(nodes: &mut BTreeMap<String, Node>, folder: &str) {
    let mut current = folder;
    while !current.is_empty() {
        nodes
            .entry(current.to_string())
            .or_insert(Node::Folder);
        current = parent(current);
    }
}

fn ensure_folder_path(nodes: &BTreeMap<String, Node>, folder: &str) -> VaultResult<()> {
    let mut current = folder;
    while !current.is_empty() {
        if let Some(Node::File(_)) = nodes.get(current) {
            return Err(VaultError::NotADirectory(current.to_string()));
        }
        current = parent(current);
    }
    Ok(())
}

#[async_trait]
impl Vault for MemoryVault {
    async fn find_entry(&self, path: &str) -> Option<VaultEntry> {
        let path = normalize(path).ok()?;
        if path.is_empty() {
            return Some(VaultEntry::folder(""));
        }
        let nodes = self.read_nodes();
        nodes.get(&path).map(|node| VaultEntry {
            path: path.clone(),
            kind: node.kind(),
        })
    }

    async fn rename(&self, entry: &VaultEntry, new_path: &str) -> VaultResult<()> {
        let from = normalize(&entry.path)?;
        let to = normalize(new_path)?;
        if from.is_empty() || to.is_empty() {
            return Err(VaultError::SandboxViolation(
                "cannot rename the vault root".into(),
            ));
        }

        let mut nodes = self.write_nodes();
        match nodes.get(&from) {
            Some(node) if node.kind() == entry.kind => {},
            _ => return Err(VaultError::NotFound(from)),
        }
        if nodes.contains_key(&to) {
            return Err(VaultError::AlreadyExists(to));
        }
        if entry.is_folder() && is_within(&to, &from) {
            return Err(VaultError::SandboxViolation(format!(
                "cannot move folder {from} into itself"
            )));
        }
        ensure_folder_path(&nodes, parent(&to))?;
        insert_ancestors(&mut nodes, parent(&to));

        let moved: Vec<String> = nodes
            .keys()
            .filter(|key| is_within(key, &from))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = nodes.remove(&key) {
                let suffix = &key[from.len()..];
                nodes.insert(format!("{to}{suffix}"), node);
            }
        }
        Ok(())
    }

    async fn delete(&self, entry: &VaultEntry, recursive: bool) -> VaultResult<()> {
        let path = normalize(&entry.path)?;
        if path.is_empty() {
            return Err(VaultError::SandboxViolation(
                "cannot delete the vault root".into(),
            ));
        }

        let mut nodes = self.write_nodes();
        match nodes.get(&path) {
            None => return Err(VaultError::NotFound(path)),
            Some(Node::File(_)) => {
                nodes.remove(&path);
                return Ok(());
            },
            Some(Node::Folder) => {},
        }

        let doomed: Vec<String> = nodes
            .keys()
            .filter(|key| is_within(key, &path))
            .cloned()
            .collect();
        if doomed.len() > 1 && !recursive {
            return Err(VaultError::NotEmpty(path));
        }
        for key in doomed {
            nodes.remove(&key);
        }
        Ok(())
    }

    async fn create_folder(&self, path: &str) -> VaultResult<()> {
        let path = normalize(path)?;
        let mut nodes = self.write_nodes();
        if path.is_empty() || nodes.contains_key(&path) {
            return Err(VaultError::AlreadyExists(path));
        }
        ensure_folder_path(&nodes, parent(&path))?;
        insert_ancestors(&mut nodes, &path);
        Ok(())
    }

    async fn read(&self, entry: &VaultEntry) -> VaultResult<String> {
        let path = normalize(&entry.path)?;
        match self.read_nodes().get(&path) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(VaultError::NotFound(path)),
        }
    }

    async fn write(&self, path: &str, content: &str) -> VaultResult<()> {
        let path = normalize(path)?;
        let mut nodes = self.write_nodes();
        let folder = parent(&path);
        if !folder.is_empty() && !matches!(nodes.get(folder), Some(Node::Folder)) {
            return Err(VaultError::NotFound(folder.to_string()));
        }
        if path.is_empty() || matches!(nodes.get(&path), Some(Node::Folder)) {
            return Err(VaultError::AlreadyExists(path));
        }
        nodes.insert(path, Node::File(content.to_string()));
        Ok(())
    }

    async fn list(&self, folder: &str) -> VaultResult<Vec<VaultEntry>> {
        let folder = normalize(folder)?;
        let nodes = self.read_nodes();
        if !folder.is_empty() && !matches!(nodes.get(&folder), Some(Node::Folder)) {
            return Err(VaultError::NotFound(folder));
        }
        Ok(nodes
            .iter()
            .filter(|(key, _)| parent(key) == folder)
            .map(|(key, node)| VaultEntry {
                path: key.clone(),
                kind: node.kind(),
            })
            .collect())
    }

    async fn markdown_files(&self) -> VaultResult<Vec<VaultEntry>> {
        Ok(self
            .read_nodes()
            .iter()
            .map(|(key, node)| VaultEntry {
                path: key.clone(),
                kind: node.kind(),
            })
            .filter(VaultEntry::is_markdown)
            .collect())
    }
}
