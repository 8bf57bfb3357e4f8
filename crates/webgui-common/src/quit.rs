//! Shared shutdown flag between a signal handler and a polling loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation token. Every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct QuitFlag {
    raised: Arc<AtomicBool>,
}

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this flag to wind down.
    pub fn request(&self) {
        if !self.raised.swap(true, Ordering::SeqCst) {
            tracing::debug!("quit requested");
        }
    }

    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
