//! Platform glue for the host transport.
//!
//! On wasm the plugin runs inside the host's frame: environment detection
//! inspects the parent frame and delivery goes through `postMessage`. On
//! native targets the session runs standalone; detection reports false and
//! delivery drops messages after logging, which keeps the whole channel
//! exercisable from ordinary unit tests.

use crate::channel::HostSession;

// ============================================================================
// WASM bridge
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod wasm_bridge {
    use crate::channel::{ChannelEvent, HostSession};
    use wasm_bindgen::JsValue;

    /// Detect whether this execution context is embedded in the host.
    ///
    /// Embedded means a parent frame distinct from our own window whose URL
    /// contains `marker`. A cross-origin failure while reading the parent
    /// location counts as embedded, not as an error: embedding sandboxes
    /// routinely block that introspection.
    pub fn detect_host_environment(marker: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let parent = match window.parent() {
            Ok(Some(parent)) => parent,
            _ => return false,
        };
        if js_sys::Object::is(parent.as_ref(), window.as_ref()) {
            // Top-level window: not embedded at all.
            return false;
        }
        match parent.location().href() {
            Ok(href) => href.contains(marker),
            Err(_) => true,
        }
    }

    /// Deliver one encoded envelope to the parent frame.
    ///
    /// Best-effort: failures are logged, never raised.
    pub fn deliver(json: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(Some(parent)) = window.parent() else {
            log::debug!("no parent frame, dropping outbound message");
            return;
        };
        let value = match js_sys::JSON::parse(json) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to re-parse outbound envelope: {err:?}");
                return;
            }
        };
        if let Err(err) = parent.post_message(&value, "*") {
            log::warn!("failed to post message to host: {err:?}");
        }
    }

    /// Route the payload of a `message` DOM event into the session.
    pub fn route_js_message(session: &mut HostSession, data: &JsValue) -> Option<ChannelEvent> {
        let json = js_sys::JSON::stringify(data).ok()?;
        let raw: String = json.into();
        session.handle_message(&raw)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_bridge::{deliver, detect_host_environment, route_js_message};

// ============================================================================
// Native fallback
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native_bridge {
    /// Outside a browser there is no host frame to be embedded in.
    pub fn detect_host_environment(_marker: &str) -> bool {
        false
    }

    /// Best-effort delivery with nowhere to deliver to.
    pub fn deliver(json: &str) {
        let preview = json.get(..100).unwrap_or(json);
        log::debug!("no host transport on this platform, dropping outbound message: {preview}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_bridge::{deliver, detect_host_environment};

/// Drain the session's outbound queue through the platform transport.
pub fn flush(session: &mut HostSession) {
    for message in session.take_outgoing() {
        deliver(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MessageKind;
    use serde_json::json;

    #[test]
    fn test_native_detection_is_standalone() {
        assert!(!detect_host_environment("designhost"));
    }

    #[test]
    fn test_flush_drains_the_queue() {
        let mut session = HostSession::new(false);
        session.send(MessageKind::GetSelection, json!({}));
        session.send(MessageKind::GetSelection, json!({}));
        flush(&mut session);
        assert!(!session.has_outgoing());
    }
}
