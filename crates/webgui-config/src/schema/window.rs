//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Native window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Pixels subtracted from the allocated height before the page is
    /// asked to resize (valid range: 0-200).
    pub v_border: u32,
    /// Enable the web inspector.
    pub devtools: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "webgui".into(),
            width: 800,
            height: 600,
            v_border: 20,
            devtools: false,
        }
    }
}
