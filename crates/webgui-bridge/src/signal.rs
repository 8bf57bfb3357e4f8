//! Content-to-host signal payloads.
//!
//! Content reports events by setting its document title. The host sees the
//! raw title string; this module encodes and decodes the JSON object form
//! and recognizes the `"null"` reset value the content writes between
//! messages so that two identical payloads still register as a change.

use serde_json::{Map, Value};
use webgui_common::BridgeError;

/// Title value the content writes before every real message.
pub const NULL_SENTINEL: &str = "null";

/// A decoded JSON payload: a mapping with string keys.
pub type Payload = Map<String, Value>;

pub fn is_sentinel(raw: &str) -> bool {
    raw == NULL_SENTINEL
}

/// Serialize a payload the way content encodes it into the title.
pub fn encode_payload(payload: &Payload) -> String {
    serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string())
}

/// Parse a title string that must hold a JSON object.
pub fn decode_payload(raw: &str) -> Result<Payload, BridgeError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(BridgeError::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(BridgeError::Decode(e.to_string())),
    }
}

/// Build `{"event": name, ...extra}`. `extra` cannot override `event`.
pub fn event_payload(name: &str, extra: Payload) -> Payload {
    let mut payload = extra;
    payload.insert("event".to_string(), Value::String(name.to_string()));
    payload
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
