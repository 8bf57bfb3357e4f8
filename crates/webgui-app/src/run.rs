//! Open the content page on a GUI thread and pump its events through the
//! [`Driver`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use webgui_bridge::headless::{HeadlessToolkit, RecordingView};
use webgui_bridge::{
    signal, BridgeOptions, Browser, BrowserEvent, BrowserHandle, ContentView, Encoding, GuiThread,
    TitleSink, Toolkit, ViewRegistry, WidgetMap,
};
use webgui_common::{BridgeError, QuitFlag, WebGuiError};
use webgui_config::{DeliveryMode, SignalEncoding, WebGuiConfig};
use webgui_webview::uri;

use crate::driver::Driver;

const CHART: &str = "chart";

/// Everything a session needs once config and command line are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: WebGuiConfig,
    pub content: PathBuf,
    pub headless: bool,
    pub max_messages: Option<usize>,
}

/// Outcome of a finished session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub handled: usize,
    pub selected: Vec<usize>,
}

pub fn run(settings: &RunSettings, quit: &QuitFlag) -> Result<RunSummary, WebGuiError> {
    #[cfg(feature = "native")]
    if !settings.headless {
        use webgui_webview::native::{NativeToolkit, NativeView, WindowSettings};

        let window = &settings.config.window;
        let toolkit = NativeToolkit::new(WindowSettings {
            title: window.title.clone(),
            width: window.width,
            height: window.height,
        })
        .quit_on_close(quit.clone());
        let uri = uri::file_uri(&settings.content)?;
        let factory = NativeView::factory(window.v_border, window.devtools);
        return drive(toolkit, factory, &uri, settings, quit);
    }

    #[cfg(not(feature = "native"))]
    if !settings.headless {
        info!("built without the native backend; running headless");
    }

    let encoding = encoding(settings.config.bridge.encoding);
    let window = &settings.config.window;
    let (factory, _probe) =
        RecordingView::factory((window.width, window.height), Some(ready_signal(encoding)));
    let uri = headless_uri(&settings.content)?;
    drive(HeadlessToolkit, factory, &uri, settings, quit)
}

fn drive<T, F>(
    toolkit: T,
    factory: F,
    uri: &str,
    settings: &RunSettings,
    quit: &QuitFlag,
) -> Result<RunSummary, WebGuiError>
where
    T: Toolkit,
    F: FnOnce(&mut ViewRegistry, TitleSink) -> Result<Box<dyn ContentView>, BridgeError>
        + Send
        + 'static,
{
    let bridge = &settings.config.bridge;
    let window = &settings.config.window;
    let encoding = encoding(bridge.encoding);
    let poll_timeout = Duration::from_millis(bridge.poll_timeout_ms);
    let call_timeout = (bridge.sync_call_timeout_ms > 0)
        .then(|| Duration::from_millis(bridge.sync_call_timeout_ms));
    let driver = Driver::new(window.width, window.height, window.v_border);

    let gui = GuiThread::start(toolkit)?;
    let invoker = gui.invoker();
    let control = ControlLoop {
        gui: &gui,
        quit,
        poll_timeout,
    };

    let summary = match bridge.delivery {
        DeliveryMode::Polling => {
            let options = BridgeOptions::polling()
                .encoding(encoding)
                .echo(bridge.echo)
                .call_timeout(call_timeout);
            let browser = Browser::open(&invoker, uri, options, factory)?;
            let widgets: WidgetMap<BrowserHandle> =
                [(CHART, browser.handle())].into_iter().collect();
            poll(&control, &browser, &widgets, driver, encoding, settings.max_messages)?
        }
        DeliveryMode::Listener => {
            let handled = Arc::new(AtomicUsize::new(0));
            let driver = Arc::new(Mutex::new(driver));
            let listener = listen(
                Arc::clone(&driver),
                Arc::clone(&handled),
                settings.max_messages,
                quit.clone(),
            );
            let options = BridgeOptions::with_listener(listener)
                .encoding(encoding)
                .echo(bridge.echo)
                .call_timeout(call_timeout);
            let browser = Browser::open(&invoker, uri, options, factory)?;
            control.wait_for_quit()?;
            drop(browser);
            let selected = driver.lock().unwrap_or_else(|e| e.into_inner()).selected();
            RunSummary {
                handled: handled.load(Ordering::SeqCst),
                selected,
            }
        }
    };

    if gui.is_running() {
        gui.stop()?;
    } else {
        gui.join()?;
    }
    info!(handled = summary.handled, "session finished");
    Ok(summary)
}

/// Stop conditions the control thread checks between waits.
struct ControlLoop<'a> {
    gui: &'a GuiThread,
    quit: &'a QuitFlag,
    poll_timeout: Duration,
}

impl ControlLoop<'_> {
    /// `Ok(false)` once quit was requested. A GUI thread that exited without
    /// a quit request ends the session with [`BridgeError::LoopClosed`].
    fn keep_running(&self) -> Result<bool, BridgeError> {
        if self.quit.is_set() {
            return Ok(false);
        }
        if !self.gui.is_running() {
            error!("gui thread exited unexpectedly");
            return Err(BridgeError::LoopClosed);
        }
        Ok(true)
    }

    fn wait_for_quit(&self) -> Result<(), BridgeError> {
        while self.keep_running()? {
            thread::sleep(self.poll_timeout);
        }
        Ok(())
    }
}

fn poll(
    control: &ControlLoop<'_>,
    browser: &Browser,
    widgets: &WidgetMap<BrowserHandle>,
    mut driver: Driver,
    encoding: Encoding,
    max_messages: Option<usize>,
) -> Result<RunSummary, BridgeError> {
    let mut handled = 0;
    while control.keep_running()? && max_messages.map_or(true, |max| handled < max) {
        let Some(raw) = browser.receive(control.poll_timeout)? else {
            continue;
        };
        handled += 1;
        if let Some(script) = driver.dispatch_raw(&raw, encoding) {
            widgets.get(CHART)?.send(script);
        }
    }
    debug!(handled, "polling loop finished");
    Ok(RunSummary {
        handled,
        selected: driver.selected(),
    })
}

fn listen(
    driver: Arc<Mutex<Driver>>,
    handled: Arc<AtomicUsize>,
    max_messages: Option<usize>,
    quit: QuitFlag,
) -> impl Fn(&BrowserHandle, BrowserEvent) + Send + Sync + 'static {
    move |browser, event| {
        let script = driver
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .dispatch(&event);
        if let Some(script) = script {
            browser.send(script);
        }
        let count = handled.fetch_add(1, Ordering::SeqCst) + 1;
        if max_messages.is_some_and(|max| count >= max) {
            quit.request();
        }
    }
}

fn encoding(encoding: SignalEncoding) -> Encoding {
    match encoding {
        SignalEncoding::Json => Encoding::Json,
        SignalEncoding::Token => Encoding::Token,
    }
}

/// Title a page raises once loaded, in the bridge's wire format.
fn ready_signal(encoding: Encoding) -> String {
    let event = BrowserEvent::DocumentReady;
    match (encoding, event.to_payload()) {
        (Encoding::Json, Some(payload)) => signal::encode_payload(&payload),
        _ => event.name().to_string(),
    }
}

/// The recording view never loads the file, so a missing page is tolerated.
fn headless_uri(content: &Path) -> Result<String, WebGuiError> {
    match uri::file_uri(content) {
        Ok(uri) => Ok(uri),
        Err(e) => {
            warn!(path = %content.display(), error = %e, "content not found");
            let absolute = std::env::current_dir()?.join(content);
            Ok(uri::path_to_uri(&absolute))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(delivery: DeliveryMode, encoding: SignalEncoding) -> RunSettings {
        let mut config = WebGuiConfig::default();
        config.bridge.delivery = delivery;
        config.bridge.encoding = encoding;
        config.bridge.poll_timeout_ms = 10;
        config.bridge.echo = false;
        RunSettings {
            config,
            content: PathBuf::from("html/index.html"),
            headless: true,
            max_messages: Some(1),
        }
    }

    #[test]
    fn ready_signal_matches_encoding() {
        assert_eq!(ready_signal(Encoding::Json), r#"{"event":"document-ready"}"#);
        assert_eq!(ready_signal(Encoding::Token), "document-ready");
    }

    #[test]
    fn headless_polling_handles_document_ready() {
        let quit = QuitFlag::new();
        let summary = run(&settings(DeliveryMode::Polling, SignalEncoding::Json), &quit).unwrap();
        assert_eq!(summary.handled, 1);
        assert!(summary.selected.is_empty());
    }

    #[test]
    fn headless_listener_stops_after_max_messages() {
        let quit = QuitFlag::new();
        let summary =
            run(&settings(DeliveryMode::Listener, SignalEncoding::Token), &quit).unwrap();
        assert_eq!(summary.handled, 1);
        assert!(quit.is_set());
    }

    #[test]
    fn config_encoding_maps_to_bridge_encoding() {
        assert_eq!(encoding(SignalEncoding::Json), Encoding::Json);
        assert_eq!(encoding(SignalEncoding::Token), Encoding::Token);
    }

    fn gui_stopped_without_quit() -> (GuiThread, QuitFlag) {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        gui.invoker().quit().unwrap();
        (gui, QuitFlag::new())
    }

    #[test]
    fn polling_fails_when_gui_thread_dies() {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        let (factory, _probe) = RecordingView::factory((800, 600), None);
        let browser =
            Browser::open(&gui.invoker(), "file:///index.html", BridgeOptions::polling(), factory)
                .unwrap();
        let widgets: WidgetMap<BrowserHandle> =
            [(CHART, browser.handle())].into_iter().collect();
        gui.invoker().quit().unwrap();

        let quit = QuitFlag::new();
        let control = ControlLoop {
            gui: &gui,
            quit: &quit,
            poll_timeout: Duration::from_millis(10),
        };
        let result = poll(
            &control,
            &browser,
            &widgets,
            Driver::new(800, 600, 20),
            Encoding::Json,
            None,
        );
        assert!(matches!(result, Err(BridgeError::LoopClosed)));
    }

    #[test]
    fn waiting_fails_when_gui_thread_dies() {
        let (gui, quit) = gui_stopped_without_quit();
        let control = ControlLoop {
            gui: &gui,
            quit: &quit,
            poll_timeout: Duration::from_millis(10),
        };
        assert!(matches!(control.wait_for_quit(), Err(BridgeError::LoopClosed)));
    }

    #[test]
    fn requested_quit_wins_over_dead_gui_thread() {
        let (gui, quit) = gui_stopped_without_quit();
        quit.request();
        let control = ControlLoop {
            gui: &gui,
            quit: &quit,
            poll_timeout: Duration::from_millis(10),
        };
        assert!(control.wait_for_quit().is_ok());
    }

    #[test]
    fn quit_flag_ends_polling_without_messages() {
        let quit = QuitFlag::new();
        quit.request();
        let mut settings = settings(DeliveryMode::Polling, SignalEncoding::Json);
        settings.max_messages = None;
        let summary = run(&settings, &quit).unwrap();
        assert_eq!(summary.handled, 0);
    }
}
