//! The seam between the bridge and a concrete GUI toolkit.
//!
//! A toolkit only has to offer three things: an event loop that runs until
//! told to stop, a way to queue idle callbacks onto that loop from any
//! thread, and a content view that can navigate, execute scripts, and report
//! title changes.

use std::sync::Arc;

use webgui_common::BridgeError;

use crate::registry::ViewRegistry;

/// A unit of work executed on the GUI thread. It receives the registry of
/// content views owned by that thread.
pub type IdleTask = Box<dyn FnOnce(&mut ViewRegistry) + Send + 'static>;

/// Thread-safe handle used to push work onto the GUI event loop.
pub trait IdleScheduler: Send + Sync + 'static {
    /// Queue `task` to run at the loop's next idle opportunity.
    fn schedule(&self, task: IdleTask) -> Result<(), BridgeError>;

    /// Queue loop termination behind every task already scheduled.
    fn quit(&self) -> Result<(), BridgeError>;

    /// Whether the calling thread is the one running the loop.
    fn is_loop_thread(&self) -> bool;
}

/// An event loop built on, and bound to, the GUI thread.
pub trait GuiLoop {
    fn scheduler(&self) -> Arc<dyn IdleScheduler>;

    /// Dispatch events and idle tasks until quit is requested.
    fn run(self: Box<Self>) -> Result<(), BridgeError>;
}

/// Factory for a [`GuiLoop`]. Moved onto the GUI thread and consumed there,
/// since most toolkits require the loop to be created on the thread that
/// runs it.
pub trait Toolkit: Send + 'static {
    fn create_loop(self) -> Result<Box<dyn GuiLoop>, BridgeError>;

    /// Toolkits backed by process-global state allow a single live loop.
    fn exclusive(&self) -> bool {
        false
    }
}

/// An embedded rendering widget. Lives on the GUI thread only.
pub trait ContentView {
    fn navigate(&mut self, uri: &str) -> Result<(), BridgeError>;

    /// Execute `script` verbatim in the content's scripting context.
    fn execute_script(&mut self, script: &str) -> Result<(), BridgeError>;

    /// Current allocation in pixels.
    fn size(&self) -> (u32, u32);

    /// Called when the hosting window changes size.
    fn host_resized(&mut self, _width: u32, _height: u32) {}
}

/// Callback handed to a content view; invoked with every raw title value the
/// view observes.
#[derive(Clone)]
pub struct TitleSink {
    handler: Arc<dyn Fn(String) + Send + Sync>,
}

impl TitleSink {
    pub fn new(handler: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn notify(&self, title: impl Into<String>) {
        (self.handler)(title.into());
    }
}

impl std::fmt::Debug for TitleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn title_sink_forwards_every_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let sink = TitleSink::new(move |t| log.lock().unwrap().push(t));

        sink.notify("null");
        sink.clone().notify(String::from("got-a-click"));

        assert_eq!(*seen.lock().unwrap(), vec!["null", "got-a-click"]);
    }
}
