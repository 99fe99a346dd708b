//! Plugin registration metadata.
//!
//! The host reads this descriptor once at load time to register the plugin
//! and open its entry document. It is opaque metadata to everything else in
//! the channel.

use serde::{Deserialize, Serialize};

/// The registration descriptor handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    /// Inline SVG markup used as the plugin icon.
    #[serde(rename = "iconSVG")]
    pub icon_svg: String,
    /// Entry document the host loads into the embedded frame.
    pub main: String,
}

impl PluginDescriptor {
    /// The descriptor for this plugin.
    pub fn ringtext() -> Self {
        Self {
            name: "RingText".to_string(),
            version: "1.0.0".to_string(),
            author: "RingText contributors".to_string(),
            description: "Create text along a circular path".to_string(),
            icon_svg: concat!(
                r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">"#,
                r#"<circle cx="12" cy="12" r="10"/>"#,
                r#"<path d="M12 8v8"/>"#,
                r#"<path d="M8 12h8"/>"#,
                "</svg>"
            )
            .to_string(),
            main: "index.html".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_wire_keys() {
        let descriptor = PluginDescriptor::ringtext();
        let json = serde_json::to_value(&descriptor).unwrap();
        // The host expects the exact camel-cased icon key.
        assert!(json.get("iconSVG").is_some());
        assert_eq!(json["name"], "RingText");
        assert_eq!(json["main"], "index.html");
    }

    #[test]
    fn test_descriptor_roundtrip() {
        let descriptor = PluginDescriptor::ringtext();
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: PluginDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
