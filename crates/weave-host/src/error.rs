//! Error types for weave-host

use thiserror::Error;

use crate::types::ConversationId;

/// Result type alias using weave-host Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by host facade calls
#[derive(Error, Debug)]
pub enum Error {
    /// The host refused the call while its turn lock was held
    #[error("conversation {0} is busy")]
    Busy(ConversationId),

    /// The conversation does not exist on the host
    #[error("unknown conversation: {0}")]
    UnknownConversation(ConversationId),

    /// The host rejected the call for another reason
    #[error("host rejected call: {0}")]
    Rejected(String),

    /// The host could not be reached at all
    #[error("host unreachable: {0}")]
    Unreachable(String),
}

impl Error {
    /// Whether this failure came from the host's turn lock
    pub fn is_busy(&self) -> bool {
        matches!(self, Error::Busy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_classification() {
        assert!(Error::Busy(ConversationId::from("c1")).is_busy());
        assert!(!Error::Rejected("nope".into()).is_busy());
        assert!(!Error::Unreachable("down".into()).is_busy());
    }

    #[test]
    fn test_display() {
        let e = Error::UnknownConversation(ConversationId::from("c9"));
        assert_eq!(e.to_string(), "unknown conversation: c9");
    }
}
