//! Wire protocol between the embedded plugin and its host.
//!
//! Every message is a JSON envelope `{ source, type, payload }`. The plugin
//! tags its messages `"plugin"`; only messages tagged `"host"` are trusted
//! inbound.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who a message claims to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    Plugin,
    Host,
}

/// The closed set of message types either side understands.
///
/// Unrecognized types deserialize to [`MessageKind::Unknown`] and are ignored
/// by the router rather than failing the whole envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    /// Plugin → host: create the shape described by the payload.
    CreateShape,
    /// Plugin → host: ask for the current selection.
    GetSelection,
    /// Host → plugin: the current selection (reply or unsolicited update).
    SelectionChanged,
    /// Host → plugin: the embedded UI finished loading.
    PluginLoaded,
    #[serde(other)]
    Unknown,
}

/// The JSON message envelope. Payload stays opaque until routed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub source: MessageSource,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    /// Build an outbound plugin-tagged envelope.
    pub fn plugin(kind: MessageKind, payload: Value) -> Self {
        Self {
            source: MessageSource::Plugin,
            kind,
            payload,
        }
    }
}

/// The host's selection description, as delivered in `selection-changed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected objects, kept opaque: the host's shape model is its own.
    #[serde(default)]
    pub objects: Vec<Value>,
    /// Selection type tag reported by the host.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_envelope_wire_format() {
        let envelope = Envelope::plugin(MessageKind::GetSelection, json!({}));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({"source": "plugin", "type": "get-selection", "payload": {}})
        );
    }

    #[test]
    fn test_inbound_envelope_parses() {
        let raw = r#"{"source":"host","type":"selection-changed","payload":{"objects":[],"type":"rect"}}"#;
        let envelope: Envelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.source, MessageSource::Host);
        assert_eq!(envelope.kind, MessageKind::SelectionChanged);

        let selection: Selection = serde_json::from_value(envelope.payload).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.kind, "rect");
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let raw = r#"{"source":"host","type":"plugin-loaded"}"#;
        let envelope: Envelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.kind, MessageKind::PluginLoaded);
        assert!(envelope.payload.is_null());
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let raw = r#"{"source":"host","type":"theme-changed","payload":{"theme":"dark"}}"#;
        let envelope: Envelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.kind, MessageKind::Unknown);
    }

    #[test]
    fn test_unknown_source_fails_parse() {
        let raw = r#"{"source":"editor","type":"plugin-loaded"}"#;
        assert!(serde_json::from_str::<Envelope>(raw).is_err());
    }

    #[test]
    fn test_selection_tolerates_missing_fields() {
        let selection: Selection = serde_json::from_value(json!({})).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.kind, "");
    }
}
