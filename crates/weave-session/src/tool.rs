//! Tool trait for host-registered tools

use async_trait::async_trait;
use std::sync::Arc;

use weave_host::ConversationId;

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Text returned to the calling agent
    pub content: String,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

/// Ambient context a tool invocation runs in.
///
/// The conversation identifier is never an argument; it comes from where
/// the call was issued.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Conversation the call was issued from
    pub conversation: ConversationId,
    /// Correlation id of this invocation
    pub call_id: String,
}

/// Trait for executable tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used in API calls)
    fn name(&self) -> &str;

    /// Tool description for the LLM
    fn description(&self) -> &str;

    /// JSON Schema for parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments
    async fn execute(&self, ctx: &ToolContext, arguments: serde_json::Value) -> ToolResult;
}

/// Type alias for a boxed tool
pub type BoxedTool = Arc<dyn Tool>;
