//! Runs closures on the GUI thread from any other thread.
//!
//! Two flavors mirror how toolkits are usually driven from worker threads:
//! - fire-and-forget: queue the closure as an idle callback and return
//! - blocking: queue it, then wait on a per-call condition for its result
//!
//! Failures inside fire-and-forget work are logged on the GUI thread and
//! never reach the caller. Panics inside blocking work are re-raised to the
//! caller as [`BridgeError::CallPanicked`].

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tracing::error;
use webgui_common::BridgeError;

use crate::registry::ViewRegistry;
use crate::toolkit::IdleScheduler;

mod calls;
mod pending;

pub use calls::{AsyncCall, SyncCall};

/// What a fire-and-forget target may return. Errors are logged, not raised.
pub trait TaskOutcome {
    fn report(self);
}

impl TaskOutcome for () {
    fn report(self) {}
}

impl<E: fmt::Display> TaskOutcome for Result<(), E> {
    fn report(self) {
        if let Err(e) = self {
            error!(error = %e, "gui task failed");
        }
    }
}

/// Render a panic payload for logs and errors.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Handle for scheduling work on the GUI thread. Cheap to clone.
#[derive(Clone)]
pub struct Invoker {
    scheduler: Arc<dyn IdleScheduler>,
}

impl Invoker {
    pub fn new(scheduler: Arc<dyn IdleScheduler>) -> Self {
        Self { scheduler }
    }

    /// Whether the caller is running on the GUI thread.
    pub fn is_gui_thread(&self) -> bool {
        self.scheduler.is_loop_thread()
    }

    /// Queue `task` with access to the GUI thread's views. Returns at once.
    ///
    /// A panic inside `task` is caught and logged; the loop keeps running.
    /// Scheduling failures are logged as well.
    pub fn post<F, O>(&self, task: F)
    where
        F: FnOnce(&mut ViewRegistry) -> O + Send + 'static,
        O: TaskOutcome,
    {
        if let Err(e) = self.try_post(task) {
            error!(error = %e, "gui task dropped");
        }
    }

    /// Like [`Invoker::post`], but reports a closed loop to the caller.
    pub fn try_post<F, O>(&self, task: F) -> Result<(), BridgeError>
    where
        F: FnOnce(&mut ViewRegistry) -> O + Send + 'static,
        O: TaskOutcome,
    {
        self.scheduler.schedule(Box::new(move |views| {
            match panic::catch_unwind(AssertUnwindSafe(|| task(views))) {
                Ok(outcome) => outcome.report(),
                Err(payload) => {
                    error!(panic = %panic_message(payload.as_ref()), "gui task panicked");
                }
            }
        }))
    }

    /// Fire-and-forget `f` on the GUI thread.
    pub fn run_async<F, O>(&self, f: F)
    where
        F: FnOnce() -> O + Send + 'static,
        O: TaskOutcome,
    {
        self.post(move |_| f());
    }

    /// Run `task` on the GUI thread with its views and wait for the result.
    ///
    /// Fails fast with [`BridgeError::ReentrantSyncCall`] when issued from
    /// the GUI thread itself, which could otherwise never make progress.
    pub fn post_sync<F, R>(&self, task: F, timeout: Option<Duration>) -> Result<R, BridgeError>
    where
        F: FnOnce(&mut ViewRegistry) -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.scheduler.is_loop_thread() {
            return Err(BridgeError::ReentrantSyncCall);
        }

        let (call, completion) = pending::pending();
        self.scheduler.schedule(Box::new(move |views| {
            match panic::catch_unwind(AssertUnwindSafe(|| task(views))) {
                Ok(value) => completion.complete(value),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(panic = %message, "blocking gui call panicked");
                    completion.panicked(message);
                }
            }
        }))?;
        call.wait(timeout)
    }

    /// Run `f` on the GUI thread and wait for its return value.
    pub fn run_sync<F, R>(&self, f: F) -> Result<R, BridgeError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.post_sync(move |_| f(), None)
    }

    /// Wrap `f` so that every call runs it on the GUI thread, fire-and-forget.
    pub fn async_call<A, F, O>(&self, f: F) -> AsyncCall<A>
    where
        A: Send + 'static,
        F: Fn(A) -> O + Send + Sync + 'static,
        O: TaskOutcome,
    {
        AsyncCall::new(self.clone(), f)
    }

    /// Wrap `f` so that every call runs it on the GUI thread and returns its
    /// result to the caller.
    pub fn sync_call<A, R, F>(&self, f: F) -> SyncCall<A, R>
    where
        A: Send + 'static,
        R: Send + 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        SyncCall::new(self.clone(), f)
    }

    /// Queue loop termination behind all previously scheduled work.
    pub fn quit(&self) -> Result<(), BridgeError> {
        self.scheduler.quit()
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker").finish_non_exhaustive()
    }
}
