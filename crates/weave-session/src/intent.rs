//! Operation intents captured at request entry

/// What the caller asked the session surface to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Relay text to an agent within the current conversation
    Message,
    /// Start a fresh conversation with a chosen agent
    New,
    /// Summarize history, then deliver text (optionally to another agent)
    Compact,
    /// Branch the conversation and deliver text in the copy
    Fork,
}

impl OperationMode {
    /// Parse the wire form of a mode
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(OperationMode::Message),
            "new" => Some(OperationMode::New),
            "compact" => Some(OperationMode::Compact),
            "fork" => Some(OperationMode::Fork),
            _ => None,
        }
    }

    /// Wire form of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::Message => "message",
            OperationMode::New => "new",
            OperationMode::Compact => "compact",
            OperationMode::Fork => "fork",
        }
    }

    /// Whether this mode defers work until a later notification
    pub fn is_deferred(&self) -> bool {
        matches!(self, OperationMode::Message | OperationMode::Compact)
    }
}

/// A request as it arrives at the surface
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub mode: OperationMode,
    pub text: String,
    pub agent: Option<String>,
}

/// A deferred request, keyed by conversation.
///
/// At most one lives per conversation; capturing another replaces the
/// earlier one (last write wins, no queueing). Consumed exactly once:
/// relayed on the next idle for Message, folded into the compaction
/// state by the request body for Compact.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationIntent {
    pub mode: OperationMode,
    pub text: String,
    pub agent: Option<String>,
}

impl OperationIntent {
    pub(crate) fn from_request(request: &OperationRequest) -> Self {
        Self {
            mode: request.mode,
            text: request.text.clone(),
            agent: request.agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for mode in [
            OperationMode::Message,
            OperationMode::New,
            OperationMode::Compact,
            OperationMode::Fork,
        ] {
            assert_eq!(OperationMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(OperationMode::parse("merge"), None);
        assert_eq!(OperationMode::parse(""), None);
        assert_eq!(OperationMode::parse("Message"), None);
    }

    #[test]
    fn test_deferred_modes() {
        assert!(OperationMode::Message.is_deferred());
        assert!(OperationMode::Compact.is_deferred());
        assert!(!OperationMode::New.is_deferred());
        assert!(!OperationMode::Fork.is_deferred());
    }
}
