//! The host message channel.
//!
//! One [`HostSession`] per embedded UI lifetime. The session owns the
//! handshake state machine, queues outbound envelopes for the platform layer
//! to deliver, and routes inbound messages to one-shot request futures and
//! event subscribers. Everything runs on a single logical execution context;
//! suspension happens only at one-shot channel boundaries.

use crate::events::{EventHub, SubscriberId};
use crate::protocol::{Envelope, MessageKind, MessageSource, Selection};
use futures::channel::oneshot;
use ringtext_core::ShapeDocument;
use serde_json::{Value, json};
use thiserror::Error;

/// Channel errors. Transport failures are never surfaced; these cover local
/// contract violations only.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("host session is not ready (handshake not completed)")]
    NotReady,
    #[error("message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handshake state of an embedded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    /// Not running embedded in a host (standalone page).
    Uninitialized,
    /// Embedded; waiting for the host's `plugin-loaded` signal.
    AwaitingHandshake,
    /// Handshake completed; shape-creation requests may be sent.
    Ready,
}

/// Notifications produced by the inbound router.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The host confirmed the embedded UI finished loading.
    HostReady,
    /// The host reported its current selection.
    SelectionChanged(Selection),
}

/// Receiver half of a pending selection request.
///
/// Resolves with the next `selection-changed` payload; dropping it cancels
/// the request (the receiver observes [`oneshot::Canceled`] instead).
pub type SelectionRequest = oneshot::Receiver<Selection>;

/// Receiver half of a pending readiness wait.
pub type ReadySignal = oneshot::Receiver<()>;

/// State and routing for one plugin ⇄ host session.
pub struct HostSession {
    phase: ChannelPhase,
    embedded: bool,
    /// Encoded outbound envelopes, drained by the platform layer.
    outgoing: Vec<String>,
    pending_selections: Vec<oneshot::Sender<Selection>>,
    ready_waiters: Vec<oneshot::Sender<()>>,
    selection_events: EventHub<Selection>,
    ready_events: EventHub<()>,
}

impl HostSession {
    /// Create a session from an environment-detection result.
    ///
    /// An embedded session starts awaiting the handshake; a standalone one
    /// stays [`ChannelPhase::Uninitialized`] for its whole lifetime.
    pub fn new(embedded: bool) -> Self {
        Self {
            phase: if embedded {
                ChannelPhase::AwaitingHandshake
            } else {
                ChannelPhase::Uninitialized
            },
            embedded,
            outgoing: Vec::new(),
            pending_selections: Vec::new(),
            ready_waiters: Vec::new(),
            selection_events: EventHub::new(),
            ready_events: EventHub::new(),
        }
    }

    /// Whether the execution context was detected as embedded in the host.
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Current handshake phase.
    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    /// Whether the startup handshake has completed.
    pub fn is_ready(&self) -> bool {
        self.phase == ChannelPhase::Ready
    }

    // --- Outbound ---

    /// Queue a plugin-tagged envelope for delivery.
    ///
    /// Fire-and-forget: never blocks and never fails. The transport is
    /// best-effort; an envelope that cannot be encoded is dropped.
    pub fn send(&mut self, kind: MessageKind, payload: Value) {
        let envelope = Envelope::plugin(kind, payload);
        if let Ok(json) = serde_json::to_string(&envelope) {
            self.outgoing.push(json);
        }
    }

    /// Send a `create-shape` request for the given document.
    ///
    /// Rejected with [`ChannelError::NotReady`] before the handshake
    /// completes; nothing is queued for later. Callers preferring their own
    /// gating policy can check [`HostSession::is_ready`] and use
    /// [`HostSession::send`] directly.
    pub fn create_shape(&mut self, document: &ShapeDocument) -> Result<(), ChannelError> {
        if !self.is_ready() {
            return Err(ChannelError::NotReady);
        }
        let payload = serde_json::to_value(document)?;
        self.send(MessageKind::CreateShape, payload);
        Ok(())
    }

    /// Take pending outbound messages (drains the queue).
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    /// Check if there are pending outbound messages.
    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    // --- Requests ---

    /// Ask the host for its current selection.
    ///
    /// The one-shot listener is registered before the `get-selection`
    /// envelope is queued, so a response can never race past it. The
    /// listener is removed once it settles; a later `selection-changed`
    /// does not resolve it again.
    ///
    /// Overlapping calls are neither serialized nor coalesced: every request
    /// pending when a response arrives settles on that response. There is no
    /// built-in timeout; drop the receiver (or call
    /// [`HostSession::cancel_pending_selections`]) to cancel.
    pub fn request_selection(&mut self) -> SelectionRequest {
        let (tx, rx) = oneshot::channel();
        self.pending_selections.push(tx);
        self.send(MessageKind::GetSelection, json!({}));
        rx
    }

    /// Wait for the startup handshake.
    ///
    /// Resolves immediately if the session is already ready; otherwise on the
    /// first valid `plugin-loaded` message. The signal fires at most once per
    /// waiter even if the host repeats the notification.
    pub fn ready(&mut self) -> ReadySignal {
        let (tx, rx) = oneshot::channel();
        if self.is_ready() {
            let _ = tx.send(());
        } else {
            self.ready_waiters.push(tx);
        }
        rx
    }

    /// Abort every pending selection request; their receivers observe
    /// cancellation.
    pub fn cancel_pending_selections(&mut self) {
        self.pending_selections.clear();
    }

    /// Number of selection requests still awaiting a response.
    pub fn pending_selection_count(&self) -> usize {
        self.pending_selections.len()
    }

    // --- Subscriptions ---

    /// Subscribe to selection updates (replies and unsolicited changes).
    pub fn on_selection_changed(
        &mut self,
        handler: impl FnMut(&Selection) + 'static,
    ) -> SubscriberId {
        self.selection_events.subscribe(handler)
    }

    /// Remove a selection subscriber.
    pub fn off_selection_changed(&mut self, id: SubscriberId) -> bool {
        self.selection_events.unsubscribe(id)
    }

    /// Subscribe to the handshake-completed notification.
    pub fn on_host_ready(&mut self, handler: impl FnMut(&()) + 'static) -> SubscriberId {
        self.ready_events.subscribe(handler)
    }

    /// Remove a readiness subscriber.
    pub fn off_host_ready(&mut self, id: SubscriberId) -> bool {
        self.ready_events.unsubscribe(id)
    }

    // --- Inbound ---

    /// Route one inbound message.
    ///
    /// The single trust boundary: anything that is not a well-formed envelope
    /// tagged `source: "host"` is dropped silently. Recognized types resolve
    /// pending requests and notify subscribers; unrecognized types are
    /// ignored. Messages are processed in delivery order.
    pub fn handle_message(&mut self, raw: &str) -> Option<ChannelEvent> {
        let envelope: Envelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::debug!("discarding malformed inbound message: {err}");
                return None;
            }
        };
        if envelope.source != MessageSource::Host {
            log::debug!("discarding inbound message from untrusted source");
            return None;
        }

        match envelope.kind {
            MessageKind::SelectionChanged => {
                let selection: Selection = match serde_json::from_value(envelope.payload) {
                    Ok(selection) => selection,
                    Err(err) => {
                        log::debug!("discarding selection payload: {err}");
                        return None;
                    }
                };
                for tx in self.pending_selections.drain(..) {
                    // A dropped receiver just means the caller gave up.
                    let _ = tx.send(selection.clone());
                }
                self.selection_events.emit(&selection);
                Some(ChannelEvent::SelectionChanged(selection))
            }
            MessageKind::PluginLoaded => {
                if self.phase != ChannelPhase::AwaitingHandshake {
                    return None;
                }
                self.phase = ChannelPhase::Ready;
                for tx in self.ready_waiters.drain(..) {
                    let _ = tx.send(());
                }
                self.ready_events.emit(&());
                Some(ChannelEvent::HostReady)
            }
            // Plugin-originated kinds echoed back, and anything unknown.
            MessageKind::CreateShape | MessageKind::GetSelection | MessageKind::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringtext_core::{TextStyle, circular_text_document};
    use std::cell::Cell;
    use std::rc::Rc;

    const LOADED: &str = r#"{"source":"host","type":"plugin-loaded","payload":{}}"#;
    const SELECTION: &str =
        r#"{"source":"host","type":"selection-changed","payload":{"objects":[],"type":"rect"}}"#;

    fn embedded_ready_session() -> HostSession {
        let mut session = HostSession::new(true);
        assert_eq!(
            session.handle_message(LOADED),
            Some(ChannelEvent::HostReady)
        );
        session
    }

    #[test]
    fn test_standalone_session_never_initializes() {
        let mut session = HostSession::new(false);
        assert_eq!(session.phase(), ChannelPhase::Uninitialized);
        // Even a valid handshake message is noise outside the host.
        assert_eq!(session.handle_message(LOADED), None);
        assert!(!session.is_ready());
    }

    #[test]
    fn test_handshake_transitions_once() {
        let mut session = HostSession::new(true);
        assert_eq!(session.phase(), ChannelPhase::AwaitingHandshake);

        let fired = Rc::new(Cell::new(0));
        let sink = fired.clone();
        session.on_host_ready(move |()| sink.set(sink.get() + 1));

        assert_eq!(
            session.handle_message(LOADED),
            Some(ChannelEvent::HostReady)
        );
        assert!(session.is_ready());

        // A duplicate plugin-loaded must not re-fire anything.
        assert_eq!(session.handle_message(LOADED), None);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_ready_signal_before_and_after_handshake() {
        let mut session = HostSession::new(true);
        let mut early = session.ready();
        assert_eq!(early.try_recv().unwrap(), None);

        session.handle_message(LOADED);
        assert_eq!(early.try_recv().unwrap(), Some(()));

        // Already ready: resolves immediately.
        let mut late = session.ready();
        assert_eq!(late.try_recv().unwrap(), Some(()));
    }

    #[test]
    fn test_untrusted_source_is_dropped() {
        let mut session = HostSession::new(true);
        let fired = Rc::new(Cell::new(false));
        let sink = fired.clone();
        session.on_selection_changed(move |_| sink.set(true));

        // Our own tag, an unknown tag, and garbage: all silently dropped.
        let plugin_tagged =
            r#"{"source":"plugin","type":"selection-changed","payload":{"objects":[],"type":"rect"}}"#;
        assert_eq!(session.handle_message(plugin_tagged), None);
        let unknown_tagged = r#"{"source":"editor","type":"plugin-loaded"}"#;
        assert_eq!(session.handle_message(unknown_tagged), None);
        assert_eq!(session.handle_message("not json at all"), None);

        assert!(!fired.get());
        assert_eq!(session.phase(), ChannelPhase::AwaitingHandshake);
    }

    #[test]
    fn test_unrecognized_type_is_ignored() {
        let mut session = embedded_ready_session();
        let raw = r#"{"source":"host","type":"theme-changed","payload":{"theme":"dark"}}"#;
        assert_eq!(session.handle_message(raw), None);
    }

    #[test]
    fn test_request_selection_resolves_once() {
        let mut session = embedded_ready_session();

        let mut request = session.request_selection();
        // Registered before the get-selection envelope went out.
        assert_eq!(session.pending_selection_count(), 1);
        let sent = session.take_outgoing();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains(r#""type":"get-selection""#));
        assert_eq!(request.try_recv().unwrap(), None);

        let event = session.handle_message(SELECTION).unwrap();
        let selection = request.try_recv().unwrap().unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.kind, "rect");
        assert_eq!(event, ChannelEvent::SelectionChanged(selection));

        // The listener is gone; a second response re-resolves nothing.
        assert_eq!(session.pending_selection_count(), 0);
        session.handle_message(SELECTION);
        assert_eq!(session.pending_selection_count(), 0);
    }

    #[test]
    fn test_overlapping_requests_settle_together() {
        let mut session = embedded_ready_session();
        let mut first = session.request_selection();
        let mut second = session.request_selection();
        assert_eq!(session.pending_selection_count(), 2);

        session.handle_message(SELECTION);
        assert_eq!(first.try_recv().unwrap().unwrap().kind, "rect");
        assert_eq!(second.try_recv().unwrap().unwrap().kind, "rect");
    }

    #[test]
    fn test_dropped_receiver_cancels_cleanly() {
        let mut session = embedded_ready_session();
        drop(session.request_selection());
        // Resolution against the dead receiver must not panic or leak.
        session.handle_message(SELECTION);
        assert_eq!(session.pending_selection_count(), 0);
    }

    #[test]
    fn test_cancel_pending_selections() {
        let mut session = embedded_ready_session();
        let mut request = session.request_selection();
        session.cancel_pending_selections();
        assert!(request.try_recv().is_err());
        assert_eq!(session.pending_selection_count(), 0);
    }

    #[test]
    fn test_selection_event_fires_without_pending_request() {
        let mut session = embedded_ready_session();
        let seen = Rc::new(Cell::new(false));
        let sink = seen.clone();
        let id = session.on_selection_changed(move |selection| {
            assert_eq!(selection.kind, "rect");
            sink.set(true);
        });

        // Unsolicited host-side selection change still notifies the UI.
        session.handle_message(SELECTION);
        assert!(seen.get());

        assert!(session.off_selection_changed(id));
    }

    #[test]
    fn test_create_shape_gated_on_readiness() {
        let document = circular_text_document(&TextStyle::default()).unwrap();

        let mut session = HostSession::new(true);
        assert!(matches!(
            session.create_shape(&document),
            Err(ChannelError::NotReady)
        ));
        assert!(!session.has_outgoing());

        session.handle_message(LOADED);
        session.create_shape(&document).unwrap();
        let sent = session.take_outgoing();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains(r#""type":"create-shape""#));
        assert!(sent[0].contains(r#""source":"plugin""#));
        assert!(sent[0].contains("textCirclePath"));
    }

    #[test]
    fn test_send_is_fire_and_forget() {
        let mut session = HostSession::new(false);
        // Even a standalone session may queue; delivery is the platform
        // layer's concern and is best-effort there.
        session.send(MessageKind::GetSelection, json!({}));
        assert!(session.has_outgoing());
        assert_eq!(session.take_outgoing().len(), 1);
        assert!(!session.has_outgoing());
    }

    #[test]
    fn test_messages_processed_in_delivery_order() {
        let mut session = HostSession::new(true);
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let ready_sink = order.clone();
        session.on_host_ready(move |()| ready_sink.borrow_mut().push("ready"));
        let sel_sink = order.clone();
        session.on_selection_changed(move |_| sel_sink.borrow_mut().push("selection"));

        session.handle_message(LOADED);
        session.handle_message(SELECTION);
        assert_eq!(*order.borrow(), vec!["ready", "selection"]);
    }
}
