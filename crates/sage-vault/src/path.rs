use crate::{VaultError, VaultResult};
use std::path::{Path, PathBuf};

/// Normalizes a vault path into its canonical `a/b/c.md` form.
///
/// Leading and trailing separators, empty segments and `.` segments are
/// dropped, and backslashes are treated as separators. The vault root
/// normalizes to the empty string.
///
/// # Errors
///
/// Returns `VaultError::SandboxViolation` if the path contains a `..` segment.
pub fn normalize(path: &str) -> VaultResult<String> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {},
            ".." => {
                return Err(VaultError::SandboxViolation(format!(
                    "parent segments are not allowed: {path}"
                )));
            },
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}

/// Lexically resolves a vault path against the physical vault root.
///
/// A leading `/` means the vault root, never the host root. Does NOT touch
/// the filesystem.
///
/// # Errors
///
/// Returns `VaultError::SandboxViolation` if the path contains a `..` segment.
pub fn resolve_path(base_root: &Path, vault_path: &str) -> VaultResult<PathBuf> {
    let normalized = normalize(vault_path)?;
    let mut resolved = base_root.to_path_buf();
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        resolved.push(segment);
    }
    Ok(resolved)
}

/// Parent folder of a normalized vault path (`""` for top-level entries).
#[must_use]
pub fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Final segment of a normalized vault path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// True if `path` equals `ancestor` or lies beneath it.
#[must_use]
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}
