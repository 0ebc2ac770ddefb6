//! Lifecycle notifications emitted by the host
//!
//! Delivery is at-most-once per underlying host event and FIFO within a
//! conversation; ordering across conversations is not guaranteed.

use serde::{Deserialize, Serialize};

use crate::types::ConversationId;

/// A notification from the host about one conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// No turn is being processed; the conversation's lock is free
    TurnIdle { conversation: ConversationId },

    /// A summarization finished and replaced older history
    HistoryCompacted { conversation: ConversationId },

    /// A turn began processing
    TurnStarted { conversation: ConversationId },

    /// A conversation came into existence
    ConversationCreated { conversation: ConversationId },
}

impl HostEvent {
    /// The conversation this notification is scoped to
    pub fn conversation(&self) -> &ConversationId {
        match self {
            HostEvent::TurnIdle { conversation }
            | HostEvent::HistoryCompacted { conversation }
            | HostEvent::TurnStarted { conversation }
            | HostEvent::ConversationCreated { conversation } => conversation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tags() {
        let event = HostEvent::TurnIdle {
            conversation: ConversationId::from("c1"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "turn_idle");
        assert_eq!(value["conversation"], "c1");

        let event = HostEvent::HistoryCompacted {
            conversation: ConversationId::from("c2"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "history_compacted");
    }

    #[test]
    fn test_conversation_accessor() {
        let event = HostEvent::TurnStarted {
            conversation: ConversationId::from("c3"),
        };
        assert_eq!(event.conversation().as_str(), "c3");
    }
}
