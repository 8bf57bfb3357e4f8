//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{DeliveryMode, WebGuiConfig};
use std::path::Path;
use webgui_common::ConfigError;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_webgui_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[window]
title = "Charts"

[bridge]
delivery = "listener"
echo = false
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Charts");
    assert_eq!(config.bridge.delivery, DeliveryMode::Listener);
    assert!(!config.bridge.echo);
    // Defaults preserved
    assert_eq!(config.window.width, 800);
    assert_eq!(config.bridge.poll_timeout_ms, 100);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[bridge]\npoll_timeout_ms = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.bridge.poll_timeout_ms, 100);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webgui").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "webgui");
    assert_eq!(config.content.index, "html/index.html");
}

#[test]
fn default_config_toml_is_valid() {
    let config: WebGuiConfig = toml::from_str(template::default_config_toml()).unwrap();
    assert_eq!(config.window.v_border, 20);
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("webgui"));
        assert!(path_str.ends_with("config.toml"));
    }
}
