//! Dedicated GUI thread: start, scoped ownership, clean stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{error, info, warn};
use webgui_common::BridgeError;

use crate::invoker::{panic_message, Invoker};
use crate::toolkit::Toolkit;

/// Set while a loop from an exclusive toolkit is alive.
static EXCLUSIVE_LOOP_LIVE: AtomicBool = AtomicBool::new(false);

/// Owner of the thread running the GUI event loop.
///
/// Dropping the value stops the loop and joins the thread, so an early
/// return or a panic on the owning thread cannot leak a live loop.
pub struct GuiThread {
    invoker: Invoker,
    handle: Option<JoinHandle<Result<(), BridgeError>>>,
    exclusive: bool,
}

impl GuiThread {
    /// Spawn the GUI thread, build the toolkit's loop on it, and start
    /// dispatching. Returns once the loop exists; does not wait for it to
    /// finish.
    pub fn start<T: Toolkit>(toolkit: T) -> Result<Self, BridgeError> {
        let exclusive = toolkit.exclusive();
        if exclusive && EXCLUSIVE_LOOP_LIVE.swap(true, Ordering::SeqCst) {
            return Err(BridgeError::AlreadyRunning);
        }

        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let spawned = thread::Builder::new()
            .name("webgui-gui".into())
            .spawn(move || -> Result<(), BridgeError> {
                let gui_loop = match toolkit.create_loop() {
                    Ok(gui_loop) => gui_loop,
                    Err(e) => {
                        let message = e.to_string();
                        let _ = ready_tx.send(Err(e));
                        return Err(BridgeError::Backend(message));
                    }
                };
                if ready_tx.send(Ok(gui_loop.scheduler())).is_err() {
                    return Ok(());
                }
                gui_loop.run()
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                if exclusive {
                    EXCLUSIVE_LOOP_LIVE.store(false, Ordering::SeqCst);
                }
                return Err(BridgeError::Backend(format!("failed to spawn gui thread: {e}")));
            }
        };

        let scheduler = match ready_rx.recv() {
            Ok(Ok(scheduler)) => scheduler,
            Ok(Err(e)) => {
                let _ = handle.join();
                if exclusive {
                    EXCLUSIVE_LOOP_LIVE.store(false, Ordering::SeqCst);
                }
                return Err(e);
            }
            Err(_) => {
                let reason = match handle.join() {
                    Err(payload) => panic_message(payload.as_ref()),
                    Ok(_) => "loop exited before it was ready".to_string(),
                };
                if exclusive {
                    EXCLUSIVE_LOOP_LIVE.store(false, Ordering::SeqCst);
                }
                return Err(BridgeError::Backend(reason));
            }
        };

        info!("gui thread started");
        Ok(Self {
            invoker: Invoker::new(scheduler),
            handle: Some(handle),
            exclusive,
        })
    }

    /// Invoker bound to this loop.
    pub fn invoker(&self) -> Invoker {
        self.invoker.clone()
    }

    /// Whether the GUI thread is still executing.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Queue loop termination and join the thread. When this returns the
    /// GUI thread has exited.
    pub fn stop(mut self) -> Result<(), BridgeError> {
        self.shutdown()
    }

    /// Join a loop that was asked to quit from elsewhere (e.g. the window
    /// was closed).
    pub fn join(mut self) -> Result<(), BridgeError> {
        self.join_inner()
    }

    fn shutdown(&mut self) -> Result<(), BridgeError> {
        if self.handle.is_none() {
            return Ok(());
        }
        if let Err(e) = self.invoker.quit() {
            // Already gone on its own; joining still reaps it.
            warn!(error = %e, "quit request not delivered");
        }
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<(), BridgeError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        if handle.thread().id() == thread::current().id() {
            return Err(BridgeError::ReentrantSyncCall);
        }
        let joined = handle.join();
        if self.exclusive {
            EXCLUSIVE_LOOP_LIVE.store(false, Ordering::SeqCst);
        }
        let result = match joined {
            Ok(result) => result,
            Err(payload) => Err(BridgeError::ThreadJoin(panic_message(payload.as_ref()))),
        };
        info!("gui thread stopped");
        result
    }
}

impl Drop for GuiThread {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!(error = %e, "gui thread shutdown failed");
        }
    }
}

impl std::fmt::Debug for GuiThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiThread")
            .field("running", &self.is_running())
            .field("exclusive", &self.exclusive)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessToolkit, IdleLoop};
    use crate::toolkit::GuiLoop;
    use std::cell::RefCell;
    use std::panic::AssertUnwindSafe;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct FailingToolkit;

    impl Toolkit for FailingToolkit {
        fn create_loop(self) -> Result<Box<dyn GuiLoop>, BridgeError> {
            Err(BridgeError::Backend("no display".into()))
        }
    }

    struct SoloToolkit;

    impl Toolkit for SoloToolkit {
        fn create_loop(self) -> Result<Box<dyn GuiLoop>, BridgeError> {
            let (idle_loop, _) = IdleLoop::new();
            Ok(Box::new(idle_loop))
        }

        fn exclusive(&self) -> bool {
            true
        }
    }

    struct ExitNotice(mpsc::Sender<()>);

    impl Drop for ExitNotice {
        fn drop(&mut self) {
            let _ = self.0.send(());
        }
    }

    thread_local! {
        static EXIT_NOTICE: RefCell<Option<ExitNotice>> = const { RefCell::new(None) };
    }

    #[test]
    fn stop_returns_after_thread_exit() {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        assert!(gui.is_running());

        let (tx, rx) = mpsc::channel();
        gui.invoker()
            .run_sync(move || EXIT_NOTICE.with(|n| *n.borrow_mut() = Some(ExitNotice(tx))))
            .unwrap();
        assert!(rx.try_recv().is_err());

        gui.stop().unwrap();
        // Thread-local destructors run as the thread exits.
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn stopped_thread_is_no_longer_alive() {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        let invoker = gui.invoker();
        let (tx, rx) = mpsc::channel();
        invoker.run_async(move || {
            let _ = tx.send(thread::current());
        });
        let gui_thread = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(gui_thread.name(), Some("webgui-gui"));

        gui.stop().unwrap();
        assert!(matches!(invoker.run_sync(|| ()), Err(BridgeError::LoopClosed)));
    }

    #[test]
    fn pending_async_work_runs_before_quit() {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        let done = Arc::new(Mutex::new(0));
        for _ in 0..10 {
            let done = Arc::clone(&done);
            gui.invoker().run_async(move || *done.lock().unwrap() += 1);
        }
        gui.stop().unwrap();
        assert_eq!(*done.lock().unwrap(), 10);
    }

    #[test]
    fn drop_stops_the_loop() {
        let invoker = {
            let gui = GuiThread::start(HeadlessToolkit).unwrap();
            gui.invoker()
        };
        assert!(matches!(invoker.run_sync(|| ()), Err(BridgeError::LoopClosed)));
    }

    #[test]
    fn drop_during_unwind_still_stops() {
        let (tx, rx) = mpsc::channel();
        let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
            let gui = GuiThread::start(HeadlessToolkit).unwrap();
            tx.send(gui.invoker()).unwrap();
            panic!("control thread failure");
        }));
        assert!(result.is_err());

        let invoker = rx.recv().unwrap();
        assert!(matches!(invoker.run_sync(|| ()), Err(BridgeError::LoopClosed)));
    }

    #[test]
    fn toolkit_failure_surfaces_from_start() {
        let err = GuiThread::start(FailingToolkit).unwrap_err();
        assert!(matches!(err, BridgeError::Backend(ref m) if m == "no display"));
    }

    #[test]
    fn exclusive_toolkit_allows_one_live_loop() {
        let first = GuiThread::start(SoloToolkit).unwrap();
        assert!(matches!(
            GuiThread::start(SoloToolkit),
            Err(BridgeError::AlreadyRunning)
        ));
        first.stop().unwrap();

        let again = GuiThread::start(SoloToolkit).unwrap();
        again.stop().unwrap();
    }

    #[test]
    fn headless_loops_may_coexist() {
        let a = GuiThread::start(HeadlessToolkit).unwrap();
        let b = GuiThread::start(HeadlessToolkit).unwrap();
        assert_eq!(a.invoker().run_sync(|| 1).unwrap(), 1);
        assert_eq!(b.invoker().run_sync(|| 2).unwrap(), 2);
        a.stop().unwrap();
        b.stop().unwrap();
    }
}
