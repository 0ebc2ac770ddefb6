//! The asynchronous call surface of the host

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::events::HostEvent;
use crate::types::{ConversationId, EngineHint, ToastVariant, Turn, TurnRequest};

/// Calls the host accepts and the notification stream it produces.
///
/// Every call is asynchronous and may be rejected while the host's
/// per-conversation turn lock is held. Lock release is never observable
/// from the call surface; it can only be inferred from
/// [`HostEvent::TurnIdle`] notifications.
#[async_trait]
pub trait Host: Send + Sync {
    /// Submit a turn for processing
    async fn submit_turn(&self, conversation: &ConversationId, turn: TurnRequest) -> Result<()>;

    /// Forcibly stop any in-progress turn processing
    async fn interrupt(&self, conversation: &ConversationId) -> Result<()>;

    /// Begin summarizing history with the given engine.
    ///
    /// Returning `Ok` means the host accepted the request; completion is
    /// signaled later by [`HostEvent::HistoryCompacted`].
    async fn summarize(&self, conversation: &ConversationId, engine: &EngineHint) -> Result<()>;

    /// Create a fresh conversation
    async fn create_conversation(&self, title: Option<&str>) -> Result<ConversationId>;

    /// Copy a conversation, history included, into an independent one
    async fn branch_conversation(&self, conversation: &ConversationId) -> Result<ConversationId>;

    /// Ordered turn history, oldest first
    async fn list_turns(&self, conversation: &ConversationId) -> Result<Vec<Turn>>;

    /// Raise a user-visible toast. Presentation only.
    async fn show_toast(&self, message: &str, variant: ToastVariant) -> Result<()>;

    /// Subscribe to the host's notification stream
    fn subscribe(&self) -> broadcast::Receiver<HostEvent>;
}
