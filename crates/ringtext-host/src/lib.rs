//! RingText Host Channel
//!
//! Asynchronous message bus between the embedded RingText UI and its host
//! design editor: environment detection, the one-shot startup handshake,
//! selection request/response, and inbound message routing.

pub mod channel;
pub mod descriptor;
pub mod events;
pub mod platform;
pub mod protocol;

pub use channel::{
    ChannelError, ChannelEvent, ChannelPhase, HostSession, ReadySignal, SelectionRequest,
};
pub use descriptor::PluginDescriptor;
pub use events::{EventHub, SubscriberId};
pub use platform::{deliver, detect_host_environment, flush};
#[cfg(target_arch = "wasm32")]
pub use platform::route_js_message;
pub use protocol::{Envelope, MessageKind, MessageSource, Selection};
