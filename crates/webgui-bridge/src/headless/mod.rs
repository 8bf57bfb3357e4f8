//! Display-free toolkit: a real event loop thread without any windowing.
//!
//! Used by tests and by the `--headless` driver mode.

mod idle_loop;
mod recording_view;

pub use idle_loop::{HeadlessToolkit, IdleLoop, IdleLoopProxy};
pub use recording_view::{RecordingView, ViewProbe};
