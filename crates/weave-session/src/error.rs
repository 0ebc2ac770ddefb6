//! Error types for weave-session

use thiserror::Error;
use weave_host::ConversationId;

/// Result type alias using weave-session Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can fail a session operation at request time
#[derive(Error, Debug)]
pub enum Error {
    /// A host facade call was rejected
    #[error(transparent)]
    Host(#[from] weave_host::Error),

    /// Compaction needs a prior assistant turn to pick a summarization engine
    #[error("conversation {0} has no assistant turn; cannot pick an engine for summarization")]
    NoEngineHint(ConversationId),

    /// The request named a mode this surface does not know
    #[error("unknown operation mode: {0:?}")]
    UnknownMode(String),
}
