//! Type aliases for commonly used shared-ownership types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tacmap_core::types::*;
//!
//! // Instead of: Rc<RefCell<LockState>>
//! let state: Shared<LockState> = Shared::new(RefCell::new(LockState::default()));
//! ```

use parking_lot::RwLock;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// The measurement engine runs on the UI event loop; state shared between
/// the engine and other UI subsystems (the interaction lock) uses this.
pub type Shared<T> = Rc<RefCell<T>>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Used by the event bus, whose handlers may be registered from any thread.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Create a new shared value.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create a new thread-safe reader-writer value.
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
