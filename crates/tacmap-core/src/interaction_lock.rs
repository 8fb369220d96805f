//! Interaction lock shared between drawing tools and entity selection.
//!
//! While a drawing or annotation tool is active the lock is held, and the
//! entity-selection subsystem ignores map clicks. The lock is a cheap
//! cloneable handle: the engine and the selection subsystem each hold a
//! clone of the same instance. `assert` and `release` are the only
//! mutating operations.
//!
//! Ordering contract: a tool asserts the lock before it accepts map clicks
//! and releases it only after its shape or annotation has been committed.

use crate::error::ToolError;
use crate::types::{shared, Shared};

#[derive(Debug, Default)]
struct LockState {
    holder: Option<String>,
}

/// Shared "a drawing tool is active" flag.
#[derive(Debug, Clone)]
pub struct InteractionLock {
    state: Shared<LockState>,
}

impl InteractionLock {
    /// Creates a released lock.
    pub fn new() -> Self {
        Self {
            state: shared(LockState::default()),
        }
    }

    /// Asserts the lock on behalf of `tool`.
    ///
    /// Re-asserting by the current holder is a no-op. Fails with
    /// [`ToolError::LockHeld`] when another tool holds the lock; callers must
    /// deactivate that tool first.
    pub fn assert(&self, tool: impl Into<String>) -> Result<(), ToolError> {
        let tool = tool.into();
        let mut state = self.state.borrow_mut();
        match state.holder.as_deref() {
            Some(holder) if holder == tool => Ok(()),
            Some(holder) => Err(ToolError::LockHeld {
                holder: holder.to_string(),
            }),
            None => {
                tracing::debug!("Interaction lock asserted by {}", tool);
                state.holder = Some(tool);
                Ok(())
            }
        }
    }

    /// Releases the lock unconditionally, returning the previous holder.
    pub fn release(&self) -> Option<String> {
        let previous = self.state.borrow_mut().holder.take();
        if let Some(tool) = &previous {
            tracing::debug!("Interaction lock released by {}", tool);
        }
        previous
    }

    /// True while any tool holds the lock. Entity selection checks this
    /// before acting on a map click.
    pub fn is_active(&self) -> bool {
        self.state.borrow().holder.is_some()
    }

    /// Name of the tool holding the lock.
    pub fn holder(&self) -> Option<String> {
        self.state.borrow().holder.clone()
    }

    pub fn is_held_by(&self, tool: &str) -> bool {
        self.state.borrow().holder.as_deref() == Some(tool)
    }
}

impl Default for InteractionLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_and_release() {
        let lock = InteractionLock::new();
        assert!(!lock.is_active());

        lock.assert("distance").unwrap();
        assert!(lock.is_active());
        assert!(lock.is_held_by("distance"));

        assert_eq!(lock.release(), Some("distance".to_string()));
        assert!(!lock.is_active());
        assert_eq!(lock.release(), None);
    }

    #[test]
    fn test_second_tool_is_rejected() {
        let lock = InteractionLock::new();
        lock.assert("circle").unwrap();

        let err = lock.assert("annotation").unwrap_err();
        assert_eq!(
            err,
            ToolError::LockHeld {
                holder: "circle".to_string()
            }
        );
        assert!(lock.is_held_by("circle"));
    }

    #[test]
    fn test_reassert_by_holder_is_noop() {
        let lock = InteractionLock::new();
        lock.assert("area").unwrap();
        lock.assert("area").unwrap();
        assert_eq!(lock.holder(), Some("area".to_string()));
    }

    #[test]
    fn test_clones_share_state() {
        let engine_side = InteractionLock::new();
        let selection_side = engine_side.clone();

        engine_side.assert("arrow").unwrap();
        assert!(selection_side.is_active());

        engine_side.release();
        assert!(!selection_side.is_active());
    }
}
