//! Configuration validation.
//!
//! Checks numeric ranges and collects every failure into a single
//! `ConfigError`.

mod helpers;


use crate::schema::WebGuiConfig;
use helpers::{validate_nonempty, validate_range};
use webgui_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WebGuiConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_bridge(&mut errors, config);
    validate_nonempty(&mut errors, "content.index", &config.content.index);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &WebGuiConfig) {
    let w = &config.window;
    validate_range(errors, "window.width", u64::from(w.width), 1, 16384);
    validate_range(errors, "window.height", u64::from(w.height), 1, 16384);
    validate_range(errors, "window.v_border", u64::from(w.v_border), 0, 200);
    if w.v_border >= w.height {
        errors.push(format!(
            "window.v_border = {} must be smaller than window.height = {}",
            w.v_border, w.height
        ));
    }
}

fn validate_bridge(errors: &mut Vec<String>, config: &WebGuiConfig) {
    validate_range(
        errors,
        "bridge.poll_timeout_ms",
        config.bridge.poll_timeout_ms,
        1,
        10_000,
    );
}
