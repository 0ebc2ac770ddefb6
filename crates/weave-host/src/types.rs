//! Core types exchanged with the host

use serde::{Deserialize, Serialize};

/// Identifier of a conversation on the host.
///
/// Opaque and host-supplied; never generated on this side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap a host-supplied identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which side of the conversation produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// Identifies the reasoning engine that produced an assistant turn.
///
/// Summarization must run on the same engine that produced the recent
/// history, so the host reports this pair on every assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineHint {
    pub provider: String,
    pub model: String,
}

impl EngineHint {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// One unit of conversation history as reported by [`crate::Host::list_turns`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
    /// Present on assistant turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineHint>,
    pub timestamp: i64,
}

impl Turn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            engine: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create an assistant turn with its producing engine
    pub fn assistant(text: impl Into<String>, engine: EngineHint) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            engine: Some(engine),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Find the engine of the most recent assistant turn, if any.
pub fn latest_engine_hint(turns: &[Turn]) -> Option<&EngineHint> {
    turns.iter().rev().find_map(|t| match t.role {
        TurnRole::Assistant => t.engine.as_ref(),
        TurnRole::User => None,
    })
}

/// A turn submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Text of the turn
    pub text: String,
    /// Primary agent that should process the turn; the current agent when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Suppress the agent response (context injection)
    #[serde(default)]
    pub no_reply: bool,
}

impl TurnRequest {
    /// Create a plain turn submission
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            agent: None,
            no_reply: false,
        }
    }

    /// Route the turn to a specific primary agent
    pub fn with_agent(mut self, agent: Option<String>) -> Self {
        self.agent = agent;
        self
    }

    /// Mark the turn as context injection: recorded in history, no response
    pub fn silent(mut self) -> Self {
        self.no_reply = true;
        self
    }
}

/// Toast severity understood by the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Info,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_engine_hint_empty() {
        assert!(latest_engine_hint(&[]).is_none());
    }

    #[test]
    fn test_latest_engine_hint_user_only() {
        let turns = vec![Turn::user("hello"), Turn::user("anyone there?")];
        assert!(latest_engine_hint(&turns).is_none());
    }

    #[test]
    fn test_latest_engine_hint_picks_most_recent_assistant() {
        let turns = vec![
            Turn::user("q1"),
            Turn::assistant("a1", EngineHint::new("anthropic", "old-model")),
            Turn::user("q2"),
            Turn::assistant("a2", EngineHint::new("anthropic", "new-model")),
            Turn::user("q3"),
        ];
        let hint = latest_engine_hint(&turns).unwrap();
        assert_eq!(hint.model, "new-model");
    }

    #[test]
    fn test_turn_request_builders() {
        let req = TurnRequest::new("hi")
            .with_agent(Some("plan".to_string()))
            .silent();
        assert_eq!(req.text, "hi");
        assert_eq!(req.agent.as_deref(), Some("plan"));
        assert!(req.no_reply);

        let plain = TurnRequest::new("hi");
        assert!(plain.agent.is_none());
        assert!(!plain.no_reply);
    }

    #[test]
    fn test_conversation_id_display() {
        let id = ConversationId::from("conv_42");
        assert_eq!(id.to_string(), "conv_42");
        assert_eq!(id.as_str(), "conv_42");
    }
}
