use std::sync::{Arc, Mutex, MutexGuard};

use webgui_common::BridgeError;

use crate::registry::ViewRegistry;
use crate::toolkit::{ContentView, TitleSink};

#[derive(Default)]
struct Recorded {
    navigations: Vec<String>,
    scripts: Vec<String>,
    size: (u32, u32),
    sink: Option<TitleSink>,
}

/// A content view with no rendering engine behind it. It records what the
/// host asked of it and lets the caller play the content's side through a
/// [`ViewProbe`].
pub struct RecordingView {
    recorded: Arc<Mutex<Recorded>>,
    ready_title: Option<String>,
}

/// Observer and remote control for a [`RecordingView`]. `Send + Sync`.
#[derive(Clone)]
pub struct ViewProbe {
    recorded: Arc<Mutex<Recorded>>,
}

fn lock(recorded: &Mutex<Recorded>) -> MutexGuard<'_, Recorded> {
    recorded.lock().unwrap_or_else(|e| e.into_inner())
}

impl RecordingView {
    pub fn new(size: (u32, u32)) -> (Self, ViewProbe) {
        let recorded = Arc::new(Mutex::new(Recorded {
            size,
            ..Default::default()
        }));
        let view = Self {
            recorded: Arc::clone(&recorded),
            ready_title: None,
        };
        (view, ViewProbe { recorded })
    }

    /// Route title changes of this view into `sink`.
    pub fn with_sink(self, sink: TitleSink) -> Self {
        lock(&self.recorded).sink = Some(sink);
        self
    }

    /// Emit `title` after each navigation, preceded by the `"null"` reset
    /// the content-side helper performs.
    pub fn signal_on_navigate(mut self, title: impl Into<String>) -> Self {
        self.ready_title = Some(title.into());
        self
    }

    /// A factory suitable for [`Browser::open`](crate::Browser::open).
    #[allow(clippy::type_complexity)]
    pub fn factory(
        size: (u32, u32),
        ready_title: Option<String>,
    ) -> (
        impl FnOnce(&mut ViewRegistry, TitleSink) -> Result<Box<dyn ContentView>, BridgeError>
            + Send
            + 'static,
        ViewProbe,
    ) {
        let (view, probe) = Self::new(size);
        let build = move |_: &mut ViewRegistry, sink: TitleSink| {
            let mut view = view.with_sink(sink);
            if let Some(title) = ready_title {
                view = view.signal_on_navigate(title);
            }
            Ok::<_, BridgeError>(Box::new(view) as Box<dyn ContentView>)
        };
        (build, probe)
    }
}

impl ContentView for RecordingView {
    fn navigate(&mut self, uri: &str) -> Result<(), BridgeError> {
        let sink = {
            let mut recorded = lock(&self.recorded);
            recorded.navigations.push(uri.to_string());
            recorded.sink.clone()
        };
        if let (Some(sink), Some(title)) = (sink, &self.ready_title) {
            sink.notify("null");
            sink.notify(title.clone());
        }
        Ok(())
    }

    fn execute_script(&mut self, script: &str) -> Result<(), BridgeError> {
        lock(&self.recorded).scripts.push(script.to_string());
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        lock(&self.recorded).size
    }

    fn host_resized(&mut self, width: u32, height: u32) {
        lock(&self.recorded).size = (width, height);
    }
}

impl ViewProbe {
    pub fn navigations(&self) -> Vec<String> {
        lock(&self.recorded).navigations.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        lock(&self.recorded).scripts.clone()
    }

    pub fn size(&self) -> (u32, u32) {
        lock(&self.recorded).size
    }

    /// Play a content-to-host title change on the calling thread.
    /// Returns false if the view has no sink attached yet.
    pub fn emit_title(&self, title: &str) -> bool {
        let sink = lock(&self.recorded).sink.clone();
        match sink {
            Some(sink) => {
                sink.notify(title);
                true
            }
            None => false,
        }
    }
}
