//! Embedded web content for the webgui bridge.
//!
//! - `file://` URIs for local content
//! - Host-to-content script formatting
//! - The content-side helper that signals the host through the page title
//! - With the `native` feature: a `wry` + `tao` toolkit for the bridge

pub mod script;
pub mod signal_js;
pub mod uri;

#[cfg(feature = "native")]
pub mod native;

pub use signal_js::SIGNAL_INIT_SCRIPT;
pub use uri::file_uri;
