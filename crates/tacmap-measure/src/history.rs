//! Creation history for undo.

use tacmap_core::ShapeId;

/// Append-only stack of shape ids in creation order.
///
/// Undo pops the most recent entry. Shapes removed by other means are purged
/// from the stack, so the top entry always names a shape that still exists.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<ShapeId>,
}

impl HistoryStack {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly created shape
    pub fn push(&mut self, id: ShapeId) {
        self.entries.push(id);
    }

    /// Take the most recently created shape
    pub fn pop(&mut self) -> Option<ShapeId> {
        self.entries.pop()
    }

    /// The shape the next undo would remove
    pub fn latest(&self) -> Option<ShapeId> {
        self.entries.last().copied()
    }

    /// Drop the entry for a shape that was removed explicitly
    pub fn forget(&mut self, id: ShapeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
