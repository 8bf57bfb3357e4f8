//! Browser bridge: one content view, one inbound route, one outbound path.
//!
//! - **Host -> content**: scripts are queued onto the GUI thread through the
//!   [`Invoker`] and executed verbatim; the caller never waits.
//! - **Content -> host**: the view reports title changes; the bridge drops
//!   the `"null"` reset value and either queues the raw string for
//!   [`Browser::receive`] or decodes it into a [`BrowserEvent`] for a
//!   listener running on the GUI thread. The choice is fixed per bridge.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use webgui_common::BridgeError;

use crate::channel::MessageChannel;
use crate::events::{BrowserEvent, Encoding};
use crate::invoker::Invoker;
use crate::registry::ViewRegistry;
use crate::toolkit::{ContentView, TitleSink};

mod router;

use router::{Route, SignalRouter};

static NEXT_BRIDGE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identifier of a bridge and of the view it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BridgeId(u32);

impl BridgeId {
    pub fn next() -> Self {
        Self(NEXT_BRIDGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BridgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receives decoded events on the GUI thread, along with a handle to the
/// bridge that produced them.
pub type Listener = Arc<dyn Fn(&BrowserHandle, BrowserEvent) + Send + Sync>;

/// How content-to-host messages reach application code.
#[derive(Clone)]
pub enum Delivery {
    /// Raw strings are queued; the application polls [`Browser::receive`].
    Polling,
    /// Decoded events are handed to a listener from the view's callback.
    Listener(Listener),
}

impl Delivery {
    pub fn listener(f: impl Fn(&BrowserHandle, BrowserEvent) + Send + Sync + 'static) -> Self {
        Self::Listener(Arc::new(f))
    }
}

impl fmt::Debug for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polling => f.write_str("Polling"),
            Self::Listener(_) => f.write_str("Listener(..)"),
        }
    }
}

/// Construction-time configuration of a [`Browser`].
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    pub delivery: Delivery,
    pub encoding: Encoding,
    /// Log every script sent and message received at info level.
    pub echo: bool,
    /// Bound on blocking calls (`open`, `size`); `None` waits forever.
    pub call_timeout: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            delivery: Delivery::Polling,
            encoding: Encoding::Json,
            echo: false,
            call_timeout: None,
        }
    }
}

impl BridgeOptions {
    pub fn polling() -> Self {
        Self::default()
    }

    pub fn with_listener(
        f: impl Fn(&BrowserHandle, BrowserEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            delivery: Delivery::listener(f),
            ..Default::default()
        }
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// Cloneable, thread-safe handle for driving a bridge's view.
#[derive(Clone)]
pub struct BrowserHandle {
    id: BridgeId,
    invoker: Invoker,
    echo: bool,
    call_timeout: Option<Duration>,
}

impl BrowserHandle {
    pub(crate) fn new(id: BridgeId, invoker: Invoker, echo: bool) -> Self {
        Self {
            id,
            invoker,
            echo,
            call_timeout: None,
        }
    }

    pub fn id(&self) -> BridgeId {
        self.id
    }

    /// Execute `script` in the content. Never blocks; failures are logged on
    /// the GUI thread.
    pub fn send(&self, script: impl Into<String>) {
        let script = script.into();
        let id = self.id;
        if self.echo {
            info!(bridge_id = id.get(), "<<< {script}");
        } else {
            debug!(bridge_id = id.get(), len = script.len(), "script queued");
        }
        self.invoker
            .post(move |views| views.view_mut(id)?.execute_script(&script));
    }

    /// Point the view at another URI. Never blocks.
    pub fn navigate(&self, uri: impl Into<String>) {
        let uri = uri.into();
        let id = self.id;
        self.invoker.post(move |views| views.view_mut(id)?.navigate(&uri));
    }

    /// Current allocation of the view. Blocks; not callable from the GUI
    /// thread.
    pub fn size(&self) -> Result<(u32, u32), BridgeError> {
        let id = self.id;
        self.invoker.post_sync(
            move |views| {
                views
                    .get(id)
                    .map(|view| view.size())
                    .ok_or(BridgeError::ViewNotFound(id.get()))
            },
            self.call_timeout,
        )?
    }
}

impl fmt::Debug for BrowserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserHandle").field("id", &self.id).finish()
    }
}

/// Owner of one content view. Dropping it destroys the view.
pub struct Browser {
    handle: BrowserHandle,
    uri: String,
    inbox: Option<MessageChannel>,
}

fn install<F>(
    views: &mut ViewRegistry,
    id: BridgeId,
    uri: &str,
    router: SignalRouter,
    factory: F,
) -> Result<(), BridgeError>
where
    F: FnOnce(&mut ViewRegistry, TitleSink) -> Result<Box<dyn ContentView>, BridgeError>,
{
    let mut view = factory(views, router.into_sink())?;
    view.navigate(uri)?;
    views.insert(id, view);
    Ok(())
}

impl Browser {
    fn prepare(invoker: &Invoker, uri: String, options: BridgeOptions) -> (Self, SignalRouter) {
        let id = BridgeId::next();
        let mut handle = BrowserHandle::new(id, invoker.clone(), options.echo);
        handle.call_timeout = options.call_timeout;
        let (inbox, route) = match options.delivery {
            Delivery::Polling => {
                let queue = MessageChannel::new();
                (Some(queue.clone()), Route::Queue(queue))
            }
            Delivery::Listener(listener) => (
                None,
                Route::Listener {
                    listener,
                    handle: handle.clone(),
                },
            ),
        };
        let router = SignalRouter {
            id,
            encoding: options.encoding,
            echo: options.echo,
            route,
        };
        (Self { handle, uri, inbox }, router)
    }

    /// Build a view on the GUI thread with `factory`, wire its title
    /// notifications into this bridge, and navigate it to `uri`.
    ///
    /// Blocks until the view exists. Must not be called from the GUI thread;
    /// use [`Browser::open_on_gui_thread`] there.
    pub fn open<F>(
        invoker: &Invoker,
        uri: impl Into<String>,
        options: BridgeOptions,
        factory: F,
    ) -> Result<Self, BridgeError>
    where
        F: FnOnce(&mut ViewRegistry, TitleSink) -> Result<Box<dyn ContentView>, BridgeError>
            + Send
            + 'static,
    {
        let (browser, router) = Self::prepare(invoker, uri.into(), options);
        let id = browser.id();
        let uri = browser.uri.clone();
        let timeout = browser.handle.call_timeout;
        invoker.post_sync(move |views| install(views, id, &uri, router, factory), timeout)??;
        info!(bridge_id = id.get(), uri = %browser.uri, "browser opened");
        Ok(browser)
    }

    /// Same as [`Browser::open`], for callers already running on the GUI
    /// thread (for instance inside an idle task).
    pub fn open_on_gui_thread<F>(
        views: &mut ViewRegistry,
        invoker: &Invoker,
        uri: impl Into<String>,
        options: BridgeOptions,
        factory: F,
    ) -> Result<Self, BridgeError>
    where
        F: FnOnce(&mut ViewRegistry, TitleSink) -> Result<Box<dyn ContentView>, BridgeError>,
    {
        let (browser, router) = Self::prepare(invoker, uri.into(), options);
        install(views, browser.id(), &browser.uri, router, factory)?;
        info!(bridge_id = browser.id().get(), uri = %browser.uri, "browser opened");
        Ok(browser)
    }

    pub fn id(&self) -> BridgeId {
        self.handle.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn handle(&self) -> BrowserHandle {
        self.handle.clone()
    }

    /// See [`BrowserHandle::send`].
    pub fn send(&self, script: impl Into<String>) {
        self.handle.send(script);
    }

    /// Next queued message, or `Ok(None)` once `timeout` passes without one.
    ///
    /// Fails with [`BridgeError::NotPolling`] on a listener-delivery bridge.
    pub fn receive(&self, timeout: Duration) -> Result<Option<String>, BridgeError> {
        let inbox = self
            .inbox
            .as_ref()
            .ok_or(BridgeError::NotPolling(self.id().get()))?;
        let message = inbox.get(timeout);
        if let Some(message) = &message {
            debug!(bridge_id = self.id().get(), len = message.len(), "message received");
        }
        Ok(message)
    }

    /// See [`BrowserHandle::size`].
    pub fn size(&self) -> Result<(u32, u32), BridgeError> {
        self.handle.size()
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        let id = self.id();
        let removal = self.handle.invoker.try_post(move |views| {
            views.remove(id);
        });
        if removal.is_err() {
            debug!(bridge_id = id.get(), "gui loop already stopped; view went with it");
        }
    }
}

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("id", &self.id())
            .field("uri", &self.uri)
            .field("polling", &self.inbox.is_some())
            .finish()
    }
}
