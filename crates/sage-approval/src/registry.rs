//! In-memory registry of pending operations.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::{OnceCell, watch};

use crate::operation::{OperationId, PendingOperation};
use crate::outcome::OperationResult;

/// Shared slot holding the single dispatch outcome of an operation.
pub(crate) type DispatchCell = Arc<OnceCell<OperationResult>>;

struct Entry {
    op: PendingOperation,
    outcome: DispatchCell,
}

/// The authoritative store of pending operations for one session.
///
/// Thread-safe via an internal [`RwLock`] that is never held across an
/// `.await`. Every recorded decision bumps a [`watch`] counter so waiting
/// executors wake immediately.
///
/// # Example
///
/// ```
/// use sage_approval::{OperationRegistry, PendingOperation};
///
/// let registry = OperationRegistry::new();
/// let id = registry.add(PendingOperation::delete("Notes/old.md"));
/// assert!(registry.approve(&id));
/// assert!(!registry.reject(&id));
/// assert_eq!(registry.clear_resolved(), 1);
/// ```
pub struct OperationRegistry {
    entries: RwLock<HashMap<OperationId, Entry>>,
    decisions: watch::Sender<u64>,
}

impl OperationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let (decisions, _) = watch::channel(0);
        Self {
            entries: RwLock::new(HashMap::new()),
            decisions,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<OperationId, Entry>> {
        self.entries.read().unwrap_or_else(|e| {
            tracing::warn!("OperationRegistry read lock poisoned, recovering");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<OperationId, Entry>> {
        self.entries.write().unwrap_or_else(|e| {
            tracing::warn!("OperationRegistry lock poisoned, recovering");
            e.into_inner()
        })
    }

    /// Store an operation, keyed by its id.
    pub fn add(&self, op: PendingOperation) -> OperationId {
        let id = op.id;
        tracing::debug!(
            operation_id = %id,
            kind = %op.kind,
            source = %op.source_path,
            "Registered pending operation"
        );
        let entry = Entry {
            op,
            outcome: Arc::new(OnceCell::new()),
        };
        if self.write().insert(id, entry).is_some() {
            tracing::warn!(operation_id = %id, "Replaced operation with colliding id");
        }
        id
    }

    /// Snapshot of one operation.
    #[must_use]
    pub fn get(&self, id: &OperationId) -> Option<PendingOperation> {
        self.read().get(id).map(|entry| entry.op.clone())
    }

    /// Snapshot of an operation together with its dispatch slot, taken under one lock.
    pub(crate) fn lookup(&self, id: &OperationId) -> Option<(PendingOperation, DispatchCell)> {
        self.read()
            .get(id)
            .map(|entry| (entry.op.clone(), Arc::clone(&entry.outcome)))
    }

    /// Record an approval.
    ///
    /// Returns `true` only when this call made the decision. Unknown ids and
    /// already decided operations are left untouched.
    pub fn approve(&self, id: &OperationId) -> bool {
        self.decide(id, true)
    }

    /// Record a rejection. Same rules as [`approve`](Self::approve).
    pub fn reject(&self, id: &OperationId) -> bool {
        self.decide(id, false)
    }

    fn decide(&self, id: &OperationId, approve: bool) -> bool {
        {
            let mut entries = self.write();
            let Some(entry) = entries.get_mut(id) else {
                tracing::debug!(operation_id = %id, "Decision for unknown operation ignored");
                return false;
            };
            if entry.op.is_decided() {
                tracing::debug!(
                    operation_id = %id,
                    status = ?entry.op.status(),
                    "Operation already decided"
                );
                return false;
            }
            if approve {
                entry.op.approved = true;
            } else {
                entry.op.rejected = true;
            }
        }
        self.decisions.send_modify(|count| *count = count.wrapping_add(1));
        tracing::info!(operation_id = %id, approved = approve, "Operation decided");
        true
    }

    /// Snapshot of every record, resolved ones included, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<PendingOperation> {
        let mut ops: Vec<PendingOperation> =
            self.read().values().map(|entry| entry.op.clone()).collect();
        ops.sort_by_key(|op| op.created_at);
        ops
    }

    /// Snapshot of the undecided records, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingOperation> {
        let mut ops: Vec<PendingOperation> = self
            .read()
            .values()
            .filter(|entry| !entry.op.is_decided())
            .map(|entry| entry.op.clone())
            .collect();
        ops.sort_by_key(|op| op.created_at);
        ops
    }

    /// Drop every approved or rejected record. Returns how many were removed.
    pub fn clear_resolved(&self) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.op.is_decided());
        let removed = before.saturating_sub(entries.len());
        if removed > 0 {
            tracing::debug!(removed, "Cleared resolved operations");
        }
        removed
    }

    /// Number of records, resolved ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Receiver for the decision counter.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.decisions.subscribe()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.len())
            .field("decisions", &*self.decisions.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationStatus;

    #[test]
    fn test_add_and_get() {
        let registry = OperationRegistry::new();
        let op = PendingOperation::rename("Notes/a.md", "Notes/b.md");
        let id = registry.add(op.clone());
        assert_eq!(id, op.id);
        assert_eq!(registry.get(&id), Some(op));
        assert!(registry.get(&OperationId::new()).is_none());
    }

    #[test]
    fn test_first_decision_is_terminal() {
        let registry = OperationRegistry::new();
        let id = registry.add(PendingOperation::delete("a.md"));

        assert!(registry.reject(&id));
        assert!(!registry.approve(&id));
        assert!(!registry.reject(&id));

        let op = registry.get(&id).unwrap();
        assert_eq!(op.status(), OperationStatus::Rejected);
        assert!(!op.approved);
    }

    #[test]
    fn test_second_approve_reports_no_change() {
        let registry = OperationRegistry::new();
        let id = registry.add(PendingOperation::delete("a.md"));
        assert!(registry.approve(&id));
        assert!(!registry.approve(&id));
        assert_eq!(registry.get(&id).unwrap().status(), OperationStatus::Approved);
    }

    #[test]
    fn test_unknown_id_decisions_are_noops() {
        let registry = OperationRegistry::new();
        registry.add(PendingOperation::delete("a.md"));
        let rx = registry.subscribe();
        assert!(!registry.approve(&OperationId::new()));
        assert!(!registry.reject(&OperationId::new()));
        assert_eq!(*rx.borrow(), 0);
        assert_eq!(registry.pending().len(), 1);
    }

    #[test]
    fn test_decisions_bump_counter() {
        let registry = OperationRegistry::new();
        let rx = registry.subscribe();
        let a = registry.add(PendingOperation::delete("a.md"));
        let b = registry.add(PendingOperation::delete("b.md"));
        registry.approve(&a);
        registry.reject(&b);
        assert_eq!(*rx.borrow(), 2);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_decision_without_subscribers() {
        let registry = OperationRegistry::new();
        let id = registry.add(PendingOperation::create_folder("Projects"));
        assert!(registry.approve(&id));
        assert_eq!(*registry.subscribe().borrow(), 1);
    }

    #[test]
    fn test_pending_and_clear_resolved() {
        let registry = OperationRegistry::new();
        let a = registry.add(PendingOperation::delete("a.md"));
        let b = registry.add(PendingOperation::delete("b.md"));
        let c = registry.add(PendingOperation::delete("c.md"));
        registry.approve(&a);
        registry.reject(&b);

        let pending: Vec<OperationId> = registry.pending().iter().map(|op| op.id).collect();
        assert_eq!(pending, vec![c]);
        assert_eq!(registry.all().len(), 3);

        assert_eq!(registry.clear_resolved(), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&a).is_none());
        assert!(registry.get(&c).is_some());
        assert_eq!(registry.clear_resolved(), 0);
    }

    #[test]
    fn test_all_is_ordered_by_creation() {
        let registry = OperationRegistry::new();
        let mut first = PendingOperation::delete("first.md");
        let mut second = PendingOperation::delete("second.md");
        second.created_at = first.created_at;
        first.created_at -= chrono::Duration::seconds(5);
        registry.add(second);
        registry.add(first);
        let paths: Vec<String> = registry.all().into_iter().map(|op| op.source_path).collect();
        assert_eq!(paths, vec!["first.md", "second.md"]);
    }

    #[test]
    fn test_lookup_shares_dispatch_cell() {
        let registry = OperationRegistry::new();
        let id = registry.add(PendingOperation::delete("a.md"));
        let (_, first) = registry.lookup(&id).unwrap();
        let (_, second) = registry.lookup(&id).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
