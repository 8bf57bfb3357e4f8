//! webgui configuration.
//!
//! TOML-based configuration for the window, the bridge, and the content
//! page. Every section uses serde defaults so partial files work.
//!
//! ```rust,no_run
//! use webgui_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BridgeConfig, ContentConfig, DeliveryMode, LogLevel, LoggingConfig, SignalEncoding,
    WebGuiConfig, WindowConfig, CONFIG_SCHEMA_VERSION,
};

use webgui_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<WebGuiConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WebGuiConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&WebGuiConfig::default());
        assert!(json.contains("\"window\""));
        assert!(json.contains("\"bridge\""));
        assert!(json.contains("\"content\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&WebGuiConfig::default());
        let parsed: WebGuiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.window.title, "webgui");
        assert_eq!(parsed.bridge.poll_timeout_ms, 100);
        assert_eq!(parsed.content.index, "html/index.html");
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
