use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, ThreadId};

use tracing::{debug, trace};
use webgui_common::BridgeError;

use crate::registry::ViewRegistry;
use crate::toolkit::{GuiLoop, IdleScheduler, IdleTask, Toolkit};

enum Command {
    Run(IdleTask),
    Quit,
}

/// Event loop that only dispatches idle tasks, strictly in submission order.
pub struct IdleLoop {
    commands: Receiver<Command>,
    proxy: IdleLoopProxy,
    views: ViewRegistry,
}

/// Cloneable, thread-safe handle onto an [`IdleLoop`].
#[derive(Clone)]
pub struct IdleLoopProxy {
    sender: Arc<Mutex<Sender<Command>>>,
    loop_thread: Arc<OnceLock<ThreadId>>,
}

impl IdleLoop {
    pub fn new() -> (Self, IdleLoopProxy) {
        let (sender, commands) = mpsc::channel();
        let proxy = IdleLoopProxy {
            sender: Arc::new(Mutex::new(sender)),
            loop_thread: Arc::new(OnceLock::new()),
        };
        let idle_loop = Self {
            commands,
            proxy: proxy.clone(),
            views: ViewRegistry::new(),
        };
        (idle_loop, proxy)
    }

    /// Run until a quit command is dequeued. Tasks still queued behind the
    /// quit are dropped unexecuted.
    pub fn run_until_quit(mut self) {
        let _ = self.proxy.loop_thread.set(thread::current().id());
        debug!("idle loop running");

        let mut dispatched = 0u64;
        // Never disconnects: the loop keeps a proxy of its own.
        while let Ok(command) = self.commands.recv() {
            match command {
                Command::Run(task) => {
                    dispatched += 1;
                    trace!(dispatched, "idle task");
                    task(&mut self.views);
                }
                Command::Quit => break,
            }
        }

        self.views.clear();
        debug!(dispatched, "idle loop stopped");
    }
}

impl GuiLoop for IdleLoop {
    fn scheduler(&self) -> Arc<dyn IdleScheduler> {
        Arc::new(self.proxy.clone())
    }

    fn run(self: Box<Self>) -> Result<(), BridgeError> {
        self.run_until_quit();
        Ok(())
    }
}

impl IdleLoopProxy {
    fn send(&self, command: Command) -> Result<(), BridgeError> {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        sender.send(command).map_err(|_| BridgeError::LoopClosed)
    }
}

impl IdleScheduler for IdleLoopProxy {
    fn schedule(&self, task: IdleTask) -> Result<(), BridgeError> {
        self.send(Command::Run(task))
    }

    fn quit(&self) -> Result<(), BridgeError> {
        self.send(Command::Quit)
    }

    fn is_loop_thread(&self) -> bool {
        self.loop_thread.get() == Some(&thread::current().id())
    }
}

/// [`Toolkit`] producing an [`IdleLoop`]. Any number may run at once.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessToolkit;

impl Toolkit for HeadlessToolkit {
    fn create_loop(self) -> Result<Box<dyn GuiLoop>, BridgeError> {
        let (idle_loop, _proxy) = IdleLoop::new();
        Ok(Box::new(idle_loop))
    }
}
