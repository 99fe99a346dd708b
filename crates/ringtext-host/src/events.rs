//! Typed event hub scoped to a host session.
//!
//! Replaces ambient broadcast-style notifications with an explicit emitter
//! owned by the session: subscribers get a handle and can unsubscribe.

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// A minimal typed event emitter.
///
/// Handlers run synchronously, in subscription order, on the emitting call
/// stack. They receive the event by reference and cannot re-enter the hub.
pub struct EventHub<T> {
    next_id: u64,
    handlers: Vec<(u64, Box<dyn FnMut(&T)>)>,
}

impl<T> EventHub<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    /// Register a handler; returns the handle needed to unsubscribe.
    pub fn subscribe(&mut self, handler: impl FnMut(&T) + 'static) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        SubscriberId(id)
    }

    /// Remove a handler. Returns false if the handle was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id.0);
        self.handlers.len() != before
    }

    /// Invoke every handler with the event.
    pub fn emit(&mut self, event: &T) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}
