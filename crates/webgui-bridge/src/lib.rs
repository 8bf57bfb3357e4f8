//! Cross-thread bridge between a GUI event loop and an embedded web view.
//!
//! Provides:
//! - A FIFO message channel for content-to-host signals
//! - An invoker that runs closures on the GUI thread (fire-and-forget or blocking)
//! - A browser bridge that couples one content view to the channel and invoker
//! - A scoped GUI thread lifecycle
//!
//! The toolkit is abstracted behind [`toolkit::Toolkit`]; the `headless`
//! module ships a display-free implementation.

pub mod bridge;
pub mod channel;
pub mod events;
pub mod headless;
pub mod invoker;
pub mod lifecycle;
pub mod registry;
pub mod signal;
pub mod toolkit;
pub mod widgets;

pub use bridge::{BridgeId, BridgeOptions, Browser, BrowserHandle, Delivery, Listener};
pub use channel::MessageChannel;
pub use events::{BrowserEvent, Encoding};
pub use invoker::{AsyncCall, Invoker, SyncCall, TaskOutcome};
pub use lifecycle::GuiThread;
pub use registry::ViewRegistry;
pub use toolkit::{ContentView, GuiLoop, IdleScheduler, IdleTask, TitleSink, Toolkit};
pub use widgets::WidgetMap;
