//! Typed content-to-host events.

use serde::Deserialize;
use serde_json::{json, Value};
use webgui_common::BridgeError;

use crate::signal::{self, Payload};

/// How a bridge interprets raw title values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// `{"event": "...", ...}` objects.
    #[default]
    Json,
    /// Bare tokens such as `document-ready`.
    Token,
}

/// Events the content can raise. Names the host does not recognize arrive
/// as [`BrowserEvent::Unknown`] rather than as errors, leaving the policy to
/// the listener.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    DocumentReady,
    BarClicked { index: usize },
    LabelClicked { index: usize },
    Unknown { name: String, raw: String },
}

#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum KnownEvent {
    DocumentReady,
    BarClicked { index: usize },
    LabelClicked { index: usize },
}

const KNOWN_NAMES: &[&str] = &["document-ready", "bar-clicked", "label-clicked"];

impl From<KnownEvent> for BrowserEvent {
    fn from(event: KnownEvent) -> Self {
        match event {
            KnownEvent::DocumentReady => Self::DocumentReady,
            KnownEvent::BarClicked { index } => Self::BarClicked { index },
            KnownEvent::LabelClicked { index } => Self::LabelClicked { index },
        }
    }
}

impl BrowserEvent {
    pub fn decode(raw: &str, encoding: Encoding) -> Result<Self, BridgeError> {
        match encoding {
            Encoding::Json => Self::from_json(raw),
            Encoding::Token => Ok(Self::from_token(raw)),
        }
    }

    /// Decode a JSON object with a string `event` field.
    ///
    /// A known name with missing or mistyped fields is a decode error; an
    /// unknown name is not.
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        let payload = signal::decode_payload(raw)?;
        let name = match payload.get("event") {
            Some(Value::String(name)) => name.clone(),
            _ => {
                return Err(BridgeError::Decode(
                    "payload has no string `event` field".into(),
                ))
            }
        };

        match serde_json::from_value::<KnownEvent>(Value::Object(payload)) {
            Ok(known) => Ok(known.into()),
            Err(e) if KNOWN_NAMES.contains(&name.as_str()) => {
                Err(BridgeError::Decode(format!("{name}: {e}")))
            }
            Err(_) => Ok(Self::Unknown {
                name,
                raw: raw.to_string(),
            }),
        }
    }

    pub fn from_token(raw: &str) -> Self {
        match raw {
            "document-ready" => Self::DocumentReady,
            other => Self::Unknown {
                name: other.to_string(),
                raw: other.to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::DocumentReady => "document-ready",
            Self::BarClicked { .. } => "bar-clicked",
            Self::LabelClicked { .. } => "label-clicked",
            Self::Unknown { name, .. } => name,
        }
    }

    /// The JSON object content would send for this event. `None` for
    /// unknown events whose raw form is not an object.
    pub fn to_payload(&self) -> Option<Payload> {
        let mut extra = Payload::new();
        match self {
            Self::DocumentReady => {}
            Self::BarClicked { index } | Self::LabelClicked { index } => {
                extra.insert("index".to_string(), json!(index));
            }
            Self::Unknown { raw, .. } => return signal::decode_payload(raw).ok(),
        }
        Some(signal::event_payload(self.name(), extra))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_document_ready() {
        let event = BrowserEvent::from_json(r#"{"event":"document-ready"}"#).unwrap();
        assert_eq!(event, BrowserEvent::DocumentReady);
    }

    #[test]
    fn decodes_clicks_with_index() {
        assert_eq!(
            BrowserEvent::from_json(r#"{"event":"bar-clicked","index":4}"#).unwrap(),
            BrowserEvent::BarClicked { index: 4 }
        );
        assert_eq!(
            BrowserEvent::from_json(r#"{"index":0,"event":"label-clicked"}"#).unwrap(),
            BrowserEvent::LabelClicked { index: 0 }
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let event =
            BrowserEvent::from_json(r#"{"event":"bar-clicked","index":1,"value":12}"#).unwrap();
        assert_eq!(event, BrowserEvent::BarClicked { index: 1 });
    }

    #[test]
    fn unknown_name_is_not_an_error() {
        let raw = r#"{"event":"legend-hovered","series":2}"#;
        let event = BrowserEvent::from_json(raw).unwrap();
        assert_eq!(
            event,
            BrowserEvent::Unknown {
                name: "legend-hovered".into(),
                raw: raw.into()
            }
        );
        assert_eq!(event.name(), "legend-hovered");
    }

    #[test]
    fn known_name_with_bad_fields_is_an_error() {
        let err = BrowserEvent::from_json(r#"{"event":"bar-clicked"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(ref m) if m.starts_with("bar-clicked")));

        let err = BrowserEvent::from_json(r#"{"event":"bar-clicked","index":"x"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn missing_event_field_is_an_error() {
        assert!(BrowserEvent::from_json(r#"{"index":1}"#).is_err());
        assert!(BrowserEvent::from_json(r#"{"event":7}"#).is_err());
    }

    #[test]
    fn token_encoding() {
        assert_eq!(
            BrowserEvent::decode("document-ready", Encoding::Token).unwrap(),
            BrowserEvent::DocumentReady
        );
        assert_eq!(
            BrowserEvent::decode("got-a-click", Encoding::Token).unwrap(),
            BrowserEvent::Unknown {
                name: "got-a-click".into(),
                raw: "got-a-click".into()
            }
        );
        assert!(BrowserEvent::decode("got-a-click", Encoding::Json).is_err());
    }

    #[test]
    fn payload_decodes_back_to_same_event() {
        for event in [
            BrowserEvent::DocumentReady,
            BrowserEvent::BarClicked { index: 7 },
            BrowserEvent::LabelClicked { index: 11 },
        ] {
            let raw = signal::encode_payload(&event.to_payload().unwrap());
            assert_eq!(BrowserEvent::from_json(&raw).unwrap(), event);
        }
    }

    #[test]
    fn click_payload_carries_name_and_index() {
        let payload = BrowserEvent::LabelClicked { index: 4 }.to_payload().unwrap();
        assert_eq!(payload.get("event"), Some(&json!("label-clicked")));
        assert_eq!(payload.get("index"), Some(&json!(4)));
        assert_eq!(payload.len(), 2);
    }
}
