//! Bridge and content configuration types.

use serde::{Deserialize, Serialize};

/// How page events reach the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Queue raw messages for the control thread.
    #[default]
    Polling,
    /// Decode and dispatch on the GUI thread.
    Listener,
}

/// Wire format of page-to-host messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalEncoding {
    #[default]
    Json,
    Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub delivery: DeliveryMode,
    pub encoding: SignalEncoding,
    /// Receive timeout for one polling step (valid range: 1-10000).
    pub poll_timeout_ms: u64,
    /// Log every sent script and received message.
    pub echo: bool,
    /// Timeout for blocking GUI calls; 0 waits forever.
    pub sync_call_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::Polling,
            encoding: SignalEncoding::Json,
            poll_timeout_ms: 100,
            echo: true,
            sync_call_timeout_ms: 0,
        }
    }
}

/// Page loaded into the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Path of the HTML entry page, relative to the working directory.
    pub index: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            index: "html/index.html".into(),
        }
    }
}
