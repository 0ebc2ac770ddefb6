//! The `session` tool: user-facing surface of the orchestrator
//!
//! One tool with a mode selector covers all four operations. The
//! description embeds the discovered agent roster so the calling agent
//! can pick a handoff target by name.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use weave_agents::AgentInfo;

use crate::error::Error;
use crate::intent::{OperationMode, OperationRequest};
use crate::orchestrator::Orchestrator;
use crate::tool::{Tool, ToolContext, ToolResult};

/// Host-registerable tool wrapping an [`Orchestrator`]
pub struct SessionTool {
    orchestrator: Arc<Orchestrator>,
    description: String,
}

impl SessionTool {
    /// Build the tool with the agent roster baked into its description
    pub fn new(orchestrator: Arc<Orchestrator>, agents: &[AgentInfo]) -> Self {
        Self {
            orchestrator,
            description: build_description(agents),
        }
    }

    async fn fail(&self, error: Error) -> ToolResult {
        let message = format!("Session operation failed: {error}");
        self.orchestrator.report_failure(&message).await;
        ToolResult::error(format!("Error: {error}"))
    }
}

#[async_trait]
impl Tool for SessionTool {
    fn name(&self) -> &str {
        "session"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "mode": {
                    "type": "string",
                    "enum": ["message", "new", "compact", "fork"],
                    "description": "How to handle the conversation and text"
                },
                "text": {
                    "type": "string",
                    "description": "The text to deliver"
                },
                "agent": {
                    "type": "string",
                    "description": "Primary agent name (e.g. 'build', 'plan') for agent switching"
                }
            },
            "required": ["mode", "text"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, arguments: serde_json::Value) -> ToolResult {
        let Some(mode_str) = arguments.get("mode").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing 'mode' argument");
        };
        let Some(text) = arguments.get("text").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing 'text' argument");
        };
        let agent = arguments
            .get("agent")
            .and_then(|v| v.as_str())
            .map(String::from);

        let Some(mode) = OperationMode::parse(mode_str) else {
            return self.fail(Error::UnknownMode(mode_str.to_string())).await;
        };

        let request = OperationRequest {
            mode,
            text: text.to_string(),
            agent,
        };
        self.orchestrator
            .request_entered(&ctx.call_id, &ctx.conversation, &request);
        let outcome = self
            .orchestrator
            .handle_request(&ctx.conversation, request)
            .await;

        // The exit hook continues once this result is visible to the
        // caller; it must not delay the acknowledgement.
        let orchestrator = Arc::clone(&self.orchestrator);
        let call_id = ctx.call_id.clone();
        tokio::spawn(async move {
            orchestrator.request_finished(&call_id).await;
        });

        match outcome {
            Ok(ack) => ToolResult::text(ack),
            Err(error) => self.fail(error).await,
        }
    }
}

fn build_description(agents: &[AgentInfo]) -> String {
    let roster = if agents.is_empty() {
        "  (none discovered)".to_string()
    } else {
        agents
            .iter()
            .map(|a| {
                format!(
                    "  - {} - {}",
                    a.name,
                    a.description.as_deref().unwrap_or("No description available")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Multi-agent workflow operations on the current conversation.

Modes:
- message: relay text to a primary agent (or the current one) in this conversation; the reply arrives asynchronously
- new: start a fresh conversation with the chosen agent and deliver text there
- compact: summarize this conversation's history, then deliver text, optionally handing off to another agent
- fork: copy this conversation into an independent branch and deliver text there

Available primary agents:
{roster}

If agent is omitted, message and compact continue with the current agent; new and fork use the default agent."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::sync::broadcast;
    use weave_host::{
        ConversationId, EngineHint, Host, HostEvent, ToastVariant, Turn, TurnRequest,
    };

    /// Minimal host: records submits and toasts, everything succeeds
    struct MockHost {
        submits: Mutex<Vec<(String, TurnRequest)>>,
        toasts: Mutex<Vec<String>>,
        events: broadcast::Sender<HostEvent>,
    }

    impl MockHost {
        fn new() -> Arc<Self> {
            let (events, _) = broadcast::channel(16);
            Arc::new(Self {
                submits: Mutex::new(Vec::new()),
                toasts: Mutex::new(Vec::new()),
                events,
            })
        }
    }

    #[async_trait]
    impl Host for MockHost {
        async fn submit_turn(
            &self,
            conversation: &ConversationId,
            turn: TurnRequest,
        ) -> weave_host::Result<()> {
            self.submits.lock().push((conversation.to_string(), turn));
            Ok(())
        }

        async fn interrupt(&self, _conversation: &ConversationId) -> weave_host::Result<()> {
            Ok(())
        }

        async fn summarize(
            &self,
            _conversation: &ConversationId,
            _engine: &EngineHint,
        ) -> weave_host::Result<()> {
            Ok(())
        }

        async fn create_conversation(
            &self,
            _title: Option<&str>,
        ) -> weave_host::Result<ConversationId> {
            Ok(ConversationId::from("conv_new"))
        }

        async fn branch_conversation(
            &self,
            _conversation: &ConversationId,
        ) -> weave_host::Result<ConversationId> {
            Ok(ConversationId::from("conv_branch"))
        }

        async fn list_turns(&self, _conversation: &ConversationId) -> weave_host::Result<Vec<Turn>> {
            Ok(vec![])
        }

        async fn show_toast(
            &self,
            message: &str,
            _variant: ToastVariant,
        ) -> weave_host::Result<()> {
            self.toasts.lock().push(message.to_string());
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
            self.events.subscribe()
        }
    }

    fn make_tool(host: Arc<MockHost>) -> SessionTool {
        let orchestrator = Arc::new(Orchestrator::new(host));
        let agents = vec![
            AgentInfo {
                name: "build".into(),
                description: Some("Implements things".into()),
            },
            AgentInfo {
                name: "plan".into(),
                description: None,
            },
        ];
        SessionTool::new(orchestrator, &agents)
    }

    fn ctx() -> ToolContext {
        ToolContext {
            conversation: ConversationId::from("c1"),
            call_id: "call_1".into(),
        }
    }

    #[test]
    fn test_description_contains_roster() {
        let tool = make_tool(MockHost::new());
        let description = tool.description();
        assert!(description.contains("- build - Implements things"));
        assert!(description.contains("- plan - No description available"));
        assert!(description.contains("compact"));
    }

    #[test]
    fn test_schema_requires_mode_and_text() {
        let tool = make_tool(MockHost::new());
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["mode", "text"]));
        assert_eq!(
            schema["properties"]["mode"]["enum"],
            json!(["message", "new", "compact", "fork"])
        );
    }

    #[tokio::test]
    async fn test_missing_arguments_are_rejected() {
        let tool = make_tool(MockHost::new());

        let result = tool.execute(&ctx(), json!({"text": "hi"})).await;
        assert!(result.is_error);
        assert!(result.content.contains("mode"));

        let result = tool.execute(&ctx(), json!({"mode": "message"})).await;
        assert!(result.is_error);
        assert!(result.content.contains("text"));
    }

    #[tokio::test]
    async fn test_unknown_mode_fails_and_toasts() {
        let host = MockHost::new();
        let tool = make_tool(host.clone());

        let result = tool
            .execute(&ctx(), json!({"mode": "merge", "text": "hi"}))
            .await;

        assert!(result.is_error);
        assert!(result.content.starts_with("Error:"));
        let toasts = host.toasts.lock().clone();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].contains("Session operation failed"));
    }

    #[tokio::test]
    async fn test_message_mode_acknowledges_without_submitting() {
        let host = MockHost::new();
        let tool = make_tool(host.clone());

        let result = tool
            .execute(
                &ctx(),
                json!({"mode": "message", "text": "review this", "agent": "plan"}),
            )
            .await;

        assert!(!result.is_error);
        assert!(result.content.contains("plan"));
        // Delivery waits for the idle notification.
        assert!(host.submits.lock().is_empty());
    }

    #[tokio::test]
    async fn test_new_mode_returns_created_id() {
        let host = MockHost::new();
        let tool = make_tool(host.clone());

        let result = tool
            .execute(&ctx(), json!({"mode": "new", "text": "fresh start"}))
            .await;

        assert!(!result.is_error);
        assert!(result.content.contains("conv_new"));
        let submits = host.submits.lock().clone();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0].0, "conv_new");
        assert_eq!(submits[0].1.agent.as_deref(), Some("build"));
    }

    #[tokio::test]
    async fn test_compact_without_history_reports_precondition() {
        let host = MockHost::new();
        let tool = make_tool(host.clone());

        let result = tool
            .execute(&ctx(), json!({"mode": "compact", "text": "go on"}))
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("no assistant turn"));
        assert_eq!(host.toasts.lock().len(), 1);
    }
}
