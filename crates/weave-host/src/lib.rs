//! weave-host: facade over the conversational-agent host
//!
//! The host owns conversations and serializes turn processing behind an
//! internal lock. This crate defines the asynchronous call surface and the
//! notification stream the rest of weave consumes; it implements nothing
//! host-internal.

pub mod error;
pub mod events;
pub mod host;
pub mod types;

pub use error::{Error, Result};
pub use events::HostEvent;
pub use host::Host;
pub use types::{
    ConversationId, EngineHint, ToastVariant, Turn, TurnRequest, TurnRole, latest_engine_hint,
};
