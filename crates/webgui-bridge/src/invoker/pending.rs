//! Result slot for one in-flight blocking call.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use webgui_common::BridgeError;

enum State<R> {
    Waiting,
    Ready(R),
    Panicked(String),
    Abandoned,
}

struct Slot<R> {
    state: Mutex<State<R>>,
    done: Condvar,
}

impl<R> Slot<R> {
    fn state(&self) -> MutexGuard<'_, State<R>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn finish(&self, outcome: State<R>) {
        let mut state = self.state();
        if matches!(*state, State::Waiting) {
            *state = outcome;
        }
        drop(state);
        self.done.notify_all();
    }
}

/// Waiting side, kept by the calling thread.
pub(crate) struct PendingCall<R> {
    slot: Arc<Slot<R>>,
}

/// Completing side, moved into the GUI-thread task. Dropping it without
/// completing marks the call abandoned so the waiter never hangs.
pub(crate) struct Completion<R> {
    slot: Arc<Slot<R>>,
    finished: bool,
}

pub(crate) fn pending<R>() -> (PendingCall<R>, Completion<R>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(State::Waiting),
        done: Condvar::new(),
    });
    (
        PendingCall {
            slot: Arc::clone(&slot),
        },
        Completion {
            slot,
            finished: false,
        },
    )
}

impl<R> Completion<R> {
    pub(crate) fn complete(mut self, value: R) {
        self.finished = true;
        self.slot.finish(State::Ready(value));
    }

    pub(crate) fn panicked(mut self, message: String) {
        self.finished = true;
        self.slot.finish(State::Panicked(message));
    }
}

impl<R> Drop for Completion<R> {
    fn drop(&mut self) {
        if !self.finished {
            self.slot.finish(State::Abandoned);
        }
    }
}

impl<R> PendingCall<R> {
    /// Block until the GUI thread settles the call, or until `timeout`.
    pub(crate) fn wait(self, timeout: Option<Duration>) -> Result<R, BridgeError> {
        // An unrepresentable deadline waits forever.
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut state = self.slot.state();
        while matches!(*state, State::Waiting) {
            state = match deadline {
                None => self
                    .slot
                    .done
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner()),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(BridgeError::Timeout);
                    }
                    match self.slot.done.wait_timeout(state, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
            };
        }

        match std::mem::replace(&mut *state, State::Abandoned) {
            State::Ready(value) => Ok(value),
            State::Panicked(message) => Err(BridgeError::CallPanicked(message)),
            State::Abandoned | State::Waiting => Err(BridgeError::CallAbandoned),
        }
    }
}
