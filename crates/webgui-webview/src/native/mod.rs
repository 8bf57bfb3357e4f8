//! `tao` event loop and `wry` web view behind the bridge's toolkit traits.
//!
//! The loop runs on the bridge's dedicated GUI thread, so it is built with
//! `with_any_thread` where the platform allows it. macOS requires the main
//! thread for its event loop and is not supported by this backend.

mod event_loop;
mod view;

pub use event_loop::{NativeToolkit, WindowSettings};
pub use view::NativeView;
