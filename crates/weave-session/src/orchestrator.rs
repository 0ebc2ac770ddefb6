//! The operation orchestrator
//!
//! Sequences multi-step session operations against a host that serializes
//! turn processing behind an internal lock. The only feedback about that
//! lock is the notification stream, so work that cannot run inside the
//! request body is parked (as a pending intent or a compaction state)
//! and driven forward by `turn_idle` / `history_compacted` events.
//!
//! All per-conversation state lives in tables owned by this struct. The
//! compaction phase field is the single-writer gate: a transition only
//! applies when the observed phase is the exact expected predecessor, so
//! duplicate or stale notifications fall through as no-ops.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use weave_agents::DEFAULT_AGENT;
use weave_host::{
    ConversationId, Host, HostEvent, ToastVariant, TurnRequest, latest_engine_hint,
};

use crate::error::{Error, Result};
use crate::intent::{OperationIntent, OperationMode, OperationRequest};
use crate::phase::{Advance, CompactionPhase, CompactionState, PhaseEvent, advance};
use crate::settle::{SettleConfig, settle};

/// Orchestrates session operations for every conversation on one host.
pub struct Orchestrator {
    host: Arc<dyn Host>,
    settle: SettleConfig,
    /// Pending deferred intents, keyed by conversation. Last write wins.
    intents: Mutex<HashMap<ConversationId, OperationIntent>>,
    /// In-flight request correlation: call id to conversation id.
    calls: Mutex<HashMap<String, ConversationId>>,
    /// Live compact-then-send operations, keyed by conversation.
    compactions: Mutex<HashMap<ConversationId, CompactionState>>,
}

impl Orchestrator {
    /// Create an orchestrator with the default settle delays
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self::with_settle(host, SettleConfig::default())
    }

    /// Create an orchestrator with explicit settle delays
    pub fn with_settle(host: Arc<dyn Host>, settle: SettleConfig) -> Self {
        Self {
            host,
            settle,
            intents: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            compactions: Mutex::new(HashMap::new()),
        }
    }

    // ---- Request hooks ----

    /// Request-entry hook. Records the intent for deferred modes and the
    /// call correlation for compact. Pure bookkeeping; never fails.
    ///
    /// Runs before the request body because the body's own processing
    /// (history lookup, engine selection) has not happened yet.
    pub fn request_entered(
        &self,
        call_id: &str,
        conversation: &ConversationId,
        request: &OperationRequest,
    ) {
        if request.mode.is_deferred() {
            self.intents
                .lock()
                .insert(conversation.clone(), OperationIntent::from_request(request));
        }
        if request.mode == OperationMode::Compact {
            self.calls
                .lock()
                .insert(call_id.to_string(), conversation.clone());
        }
    }

    /// Request body. Performs the mode's immediate host calls and returns
    /// the acknowledgement for the caller; deferred work stays parked.
    pub async fn handle_request(
        &self,
        conversation: &ConversationId,
        request: OperationRequest,
    ) -> Result<String> {
        match request.mode {
            OperationMode::Message => Ok(message_ack(request.agent.as_deref())),
            OperationMode::New => self.start_conversation(request).await,
            OperationMode::Compact => self.begin_compaction(conversation, request).await,
            OperationMode::Fork => self.fork_conversation(conversation, request).await,
        }
    }

    /// Request-exit hook. Once the acknowledgement is visible, kick a
    /// freshly parked compaction with its first interrupt.
    pub async fn request_finished(&self, call_id: &str) {
        let conversation = self.calls.lock().remove(call_id);
        let Some(conversation) = conversation else {
            return;
        };
        if self.compaction_phase(&conversation) != Some(CompactionPhase::AwaitingFirstInterrupt) {
            return;
        }

        // Let the requesting agent's own turn bookkeeping land first.
        settle(self.settle.post_ack).await;

        if let Err(e) = self.host.interrupt(&conversation).await {
            self.abandon(&conversation, "first interrupt rejected", &e);
        }
    }

    // ---- Notification dispatch ----

    /// Consume host notifications until the stream closes.
    pub async fn drive(&self, mut events: broadcast::Receiver<HostEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "host notification stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// React to one host notification. Events that match no live state
    /// are ignored; they are expected, not errors.
    pub async fn handle_event(&self, event: HostEvent) {
        match event {
            HostEvent::TurnIdle { conversation } => self.on_turn_idle(&conversation).await,
            HostEvent::HistoryCompacted { conversation } => {
                self.on_history_compacted(&conversation).await
            }
            _ => {}
        }
    }

    /// Current compaction phase for a conversation, if one is live
    pub fn compaction_phase(&self, conversation: &ConversationId) -> Option<CompactionPhase> {
        self.compactions.lock().get(conversation).map(|s| s.phase)
    }

    /// Pending deferred intent for a conversation, if any
    pub fn pending_intent(&self, conversation: &ConversationId) -> Option<OperationIntent> {
        self.intents.lock().get(conversation).cloned()
    }

    /// Surface a request failure to the user. Presentation only; delivery
    /// problems are not worth propagating.
    pub async fn report_failure(&self, message: &str) {
        if let Err(e) = self.host.show_toast(message, ToastVariant::Error).await {
            debug!(error = %e, "toast delivery failed");
        }
    }

    // ---- Mode bodies ----

    async fn start_conversation(&self, request: OperationRequest) -> Result<String> {
        let agent = request.agent.as_deref().unwrap_or(DEFAULT_AGENT);
        let title = format!("Handoff to {agent}");
        let id = self.host.create_conversation(Some(&title)).await?;
        self.host
            .submit_turn(
                &id,
                TurnRequest::new(request.text).with_agent(Some(agent.to_string())),
            )
            .await?;
        Ok(format!("Started conversation {id} with the {agent} agent."))
    }

    async fn fork_conversation(
        &self,
        conversation: &ConversationId,
        request: OperationRequest,
    ) -> Result<String> {
        let agent = request.agent.as_deref().unwrap_or(DEFAULT_AGENT);
        let id = self.host.branch_conversation(conversation).await?;
        self.host
            .submit_turn(
                &id,
                TurnRequest::new(request.text).with_agent(Some(agent.to_string())),
            )
            .await?;
        Ok(format!(
            "Forked into conversation {id}; the {agent} agent continues there with history preserved."
        ))
    }

    /// Compact request body: resolve the engine, inject the marker turn,
    /// park the compaction state. The exit hook and the notification
    /// handlers do the rest.
    async fn begin_compaction(
        &self,
        conversation: &ConversationId,
        request: OperationRequest,
    ) -> Result<String> {
        // Consume the captured intent; its content continues life inside
        // the compaction state (or dies with a precondition failure).
        self.intents.lock().remove(conversation);

        let turns = self.host.list_turns(conversation).await?;
        let engine = latest_engine_hint(&turns)
            .cloned()
            .ok_or_else(|| Error::NoEngineHint(conversation.clone()))?;

        // The marker must be in history before summarization starts, or
        // the handoff context is lost from the summary.
        self.host
            .submit_turn(
                conversation,
                TurnRequest::new(marker_text(request.agent.as_deref())).silent(),
            )
            .await?;

        self.compactions.lock().insert(
            conversation.clone(),
            CompactionState::new(engine, request.agent.clone(), request.text),
        );

        Ok(compact_ack(request.agent.as_deref()))
    }

    // ---- Notification handlers ----

    async fn on_turn_idle(&self, conversation: &ConversationId) {
        // A parked message relay takes precedence over compaction work.
        let relay = {
            let mut intents = self.intents.lock();
            match intents.get(conversation) {
                Some(intent) if intent.mode == OperationMode::Message => {
                    intents.remove(conversation)
                }
                _ => None,
            }
        };
        if let Some(intent) = relay {
            let turn = TurnRequest::new(intent.text).with_agent(intent.agent);
            if let Err(e) = self.host.submit_turn(conversation, turn).await {
                warn!(conversation = %conversation, error = %e, "deferred relay rejected");
            }
            return;
        }

        match self.apply(conversation, PhaseEvent::TurnIdle) {
            Advance::Next(CompactionPhase::Summarizing) => {
                self.start_summarize(conversation).await;
            }
            Advance::Deliver => self.deliver_stored_text(conversation).await,
            _ => {}
        }
    }

    async fn on_history_compacted(&self, conversation: &ConversationId) {
        if self.apply(conversation, PhaseEvent::HistoryCompacted)
            != Advance::Next(CompactionPhase::CompactionConfirmed)
        {
            return;
        }

        // The lock release lags the notice; give it room, then interrupt
        // once more so the conversation is quiescent for the final send.
        settle(self.settle.post_compaction).await;

        match self.host.interrupt(conversation).await {
            Ok(()) => {
                self.apply(conversation, PhaseEvent::QuiesceInterrupted);
            }
            Err(e) => self.abandon(conversation, "quiescing interrupt rejected", &e),
        }
    }

    /// Interrupt confirmed: request summarization with the stored engine.
    async fn start_summarize(&self, conversation: &ConversationId) {
        let engine = {
            let table = self.compactions.lock();
            table.get(conversation).map(|s| s.engine.clone())
        };
        let Some(engine) = engine else {
            return;
        };

        match self.host.summarize(conversation, &engine).await {
            Ok(()) => {
                self.apply(conversation, PhaseEvent::SummarizeAccepted);
            }
            Err(e) => self.abandon(conversation, "summarize rejected", &e),
        }
    }

    /// Terminal step: the stored text goes out and the state goes away,
    /// whatever the submit outcome.
    async fn deliver_stored_text(&self, conversation: &ConversationId) {
        let state = self.compactions.lock().remove(conversation);
        let Some(state) = state else {
            return;
        };

        let turn = TurnRequest::new(state.text).with_agent(state.agent);
        if let Err(e) = self.host.submit_turn(conversation, turn).await {
            warn!(conversation = %conversation, error = %e, "post-compaction send rejected");
        }
    }

    // ---- Gate helpers ----

    /// Apply the transition function to a conversation's live state under
    /// the table lock. `Reject` doubles as "no state exists".
    fn apply(&self, conversation: &ConversationId, event: PhaseEvent) -> Advance {
        let mut table = self.compactions.lock();
        let Some(state) = table.get_mut(conversation) else {
            return Advance::Reject;
        };
        let outcome = advance(state.phase, event);
        if let Advance::Next(next) = outcome {
            state.phase = next;
        }
        outcome
    }

    /// Host-call failure during an asynchronous continuation: the
    /// operation is abandoned, not retried. The original request already
    /// returned, so the log line is the only trace.
    fn abandon(&self, conversation: &ConversationId, context: &str, error: &weave_host::Error) {
        warn!(conversation = %conversation, error = %error, "{context}; abandoning compaction");
        self.compactions.lock().remove(conversation);
    }
}

fn message_ack(agent: Option<&str>) -> String {
    match agent {
        Some(agent) => {
            format!("Relaying to the {agent} agent; the reply will arrive in this conversation.")
        }
        None => "Message queued; it will be delivered when the current turn completes.".to_string(),
    }
}

fn compact_ack(agent: Option<&str>) -> String {
    match agent {
        Some(agent) => format!(
            "History will be compacted once this response completes; the {agent} agent will continue with your message."
        ),
        None => "History will be compacted once this response completes; your message will follow here."
            .to_string(),
    }
}

/// Wording of the silent marker turn injected before compaction
fn marker_text(agent: Option<&str>) -> String {
    match agent {
        Some(agent) => {
            format!("[Handoff note: history is about to be compacted - the {agent} agent continues afterwards]")
        }
        None => "[Handoff note: history is about to be compacted]".to_string(),
    }
}
