//! Modal dismissibility control.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capability of the surrounding UI to block dismissal.
pub trait ModalControl: Send + Sync {
    fn set_hideable(&self, hideable: bool);
}

/// Atomic flag implementation; hideable until told otherwise.
#[derive(Debug)]
pub struct Modal {
    hideable: AtomicBool,
}

impl Modal {
    pub fn new() -> Self {
        Self {
            hideable: AtomicBool::new(true),
        }
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable.load(Ordering::SeqCst)
    }
}

impl Default for Modal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalControl for Modal {
    fn set_hideable(&self, hideable: bool) {
        self.hideable.store(hideable, Ordering::SeqCst);
        tracing::trace!(hideable, "Modal dismissibility changed");
    }
}

/// Keeps the modal non-dismissible while alive.
///
/// Dropping the guard restores dismissibility, including when a flow bails
/// out with `?` or its future is dropped mid-flight.
pub struct HideableGuard {
    modal: Arc<dyn ModalControl>,
}

impl HideableGuard {
    pub fn lock(modal: Arc<dyn ModalControl>) -> Self {
        modal.set_hideable(false);
        Self { modal }
    }
}

impl Drop for HideableGuard {
    fn drop(&mut self) {
        self.modal.set_hideable(true);
    }
}
