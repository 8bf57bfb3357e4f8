use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use webgui_common::BridgeError;

use super::{Invoker, TaskOutcome};

/// A callable whose body always runs on the GUI thread. Calling it queues
/// the work and returns immediately.
pub struct AsyncCall<A> {
    invoker: Invoker,
    target: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A: Send + 'static> AsyncCall<A> {
    pub(super) fn new<F, O>(invoker: Invoker, f: F) -> Self
    where
        F: Fn(A) -> O + Send + Sync + 'static,
        O: TaskOutcome,
    {
        Self {
            invoker,
            target: Arc::new(move |args| f(args).report()),
        }
    }

    pub fn call(&self, args: A) {
        let target = Arc::clone(&self.target);
        self.invoker.run_async(move || target(args));
    }
}

impl<A> Clone for AsyncCall<A> {
    fn clone(&self) -> Self {
        Self {
            invoker: self.invoker.clone(),
            target: Arc::clone(&self.target),
        }
    }
}

impl<A> fmt::Debug for AsyncCall<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncCall").finish_non_exhaustive()
    }
}

/// A callable whose body runs on the GUI thread while the caller waits for
/// the result.
///
/// Calling it from the GUI thread returns [`BridgeError::ReentrantSyncCall`].
pub struct SyncCall<A, R> {
    invoker: Invoker,
    target: Arc<dyn Fn(A) -> R + Send + Sync>,
    timeout: Option<Duration>,
}

impl<A: Send + 'static, R: Send + 'static> SyncCall<A, R> {
    pub(super) fn new<F>(invoker: Invoker, f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            invoker,
            target: Arc::new(f),
            timeout: None,
        }
    }

    /// Give up waiting after `timeout`. The GUI-side work may still run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn call(&self, args: A) -> Result<R, BridgeError> {
        let target = Arc::clone(&self.target);
        self.invoker.post_sync(move |_| target(args), self.timeout)
    }
}

impl<A, R> Clone for SyncCall<A, R> {
    fn clone(&self) -> Self {
        Self {
            invoker: self.invoker.clone(),
            target: Arc::clone(&self.target),
            timeout: self.timeout,
        }
    }
}

impl<A, R> fmt::Debug for SyncCall<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCall")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
