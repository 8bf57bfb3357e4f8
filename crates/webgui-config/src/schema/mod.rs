//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod system;
mod window;

pub use bridge::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebGuiConfig {
    pub window: WindowConfig,
    pub bridge: BridgeConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: WebGuiConfig = toml::from_str("").unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.bridge.delivery, DeliveryMode::Polling);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn sections_parse_independently() {
        let config: WebGuiConfig = toml::from_str(
            r#"
[bridge]
delivery = "listener"

[content]
index = "demo/page.html"
"#,
        )
        .unwrap();
        assert_eq!(config.bridge.delivery, DeliveryMode::Listener);
        assert_eq!(config.content.index, "demo/page.html");
        assert_eq!(config.window.title, "webgui");
    }
}
