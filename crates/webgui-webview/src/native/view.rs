use std::rc::Rc;

use tao::window::Window;
use tracing::warn;
use wry::{WebView, WebViewBuilder};

use webgui_bridge::{ContentView, TitleSink, ViewRegistry};
use webgui_common::BridgeError;

use crate::script;
use crate::signal_js::SIGNAL_INIT_SCRIPT;

/// A `wry` web view filling the native window.
pub struct NativeView {
    webview: WebView,
    window: Rc<Window>,
    v_border: u32,
}

impl NativeView {
    /// Factory for [`webgui_bridge::Browser::open`]. Must run on a loop
    /// created by [`super::NativeToolkit`].
    pub fn factory(
        v_border: u32,
        devtools: bool,
    ) -> impl FnOnce(&mut ViewRegistry, TitleSink) -> Result<Box<dyn ContentView>, BridgeError>
           + Send
           + 'static {
        move |views: &mut ViewRegistry,
              sink: TitleSink|
              -> Result<Box<dyn ContentView>, BridgeError> {
            let window = views
                .host::<Rc<Window>>()
                .cloned()
                .ok_or_else(|| BridgeError::Backend("loop has no native window".into()))?;

            let builder = WebViewBuilder::new()
                .with_initialization_script(SIGNAL_INIT_SCRIPT)
                .with_devtools(devtools)
                .with_document_title_changed_handler(move |title| sink.notify(title));

            #[cfg(any(
                target_os = "linux",
                target_os = "dragonfly",
                target_os = "freebsd",
                target_os = "netbsd",
                target_os = "openbsd",
            ))]
            let built = {
                use tao::platform::unix::WindowExtUnix;
                use wry::WebViewBuilderExtUnix;
                let vbox = window
                    .default_vbox()
                    .ok_or_else(|| BridgeError::Backend("window has no GTK container".into()))?;
                builder.build_gtk(vbox)
            };

            #[cfg(not(any(
                target_os = "linux",
                target_os = "dragonfly",
                target_os = "freebsd",
                target_os = "netbsd",
                target_os = "openbsd",
            )))]
            let built = builder.build(&*window);

            let webview = built.map_err(|e| BridgeError::Backend(e.to_string()))?;
            Ok(Box::new(NativeView {
                webview,
                window,
                v_border,
            }))
        }
    }
}

impl ContentView for NativeView {
    fn navigate(&mut self, uri: &str) -> Result<(), BridgeError> {
        self.webview
            .load_url(uri)
            .map_err(|e| BridgeError::Backend(e.to_string()))
    }

    fn execute_script(&mut self, script: &str) -> Result<(), BridgeError> {
        self.webview
            .evaluate_script(script)
            .map_err(|e| BridgeError::Script(e.to_string()))
    }

    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn host_resized(&mut self, width: u32, height: u32) {
        if let Some(command) = script::resize_for_allocation(width, height, self.v_border) {
            if let Err(e) = self.webview.evaluate_script(&command) {
                warn!(error = %e, "resize script failed");
            }
        }
    }
}
