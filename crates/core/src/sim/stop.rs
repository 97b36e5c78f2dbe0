//! Cancellation flag shared between a running simulation and its controllers.
//!
//! The run loop polls the flag only at step boundaries, so a step that has begun
//! always completes before the stop takes effect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Clonable handle used to request that a running simulation stop.
///
/// Every clone refers to the same flag. Handles are `Send + Sync` and may be
/// moved to another thread or captured by an observer.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the simulation to stop before its next step.
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if a stop has been requested and not yet honoured.
    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Clears a pending request and reports whether there was one.
    pub(crate) fn take_request(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }

    /// Drops any pending request.
    pub(crate) fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}
