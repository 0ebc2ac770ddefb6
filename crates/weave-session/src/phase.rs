//! Compaction phase machine
//!
//! One [`CompactionState`] exists per conversation while a
//! compact-then-send operation is in flight. The phase field is the
//! single-writer gate: every trigger site goes through [`advance`], which
//! either yields the exact successor or rejects the event. There is no
//! phase-skipping path and no way back.

use weave_host::EngineHint;

/// Progress of a compact-then-send operation. Ordered; never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompactionPhase {
    /// Acknowledgement returned; waiting for the post-ack interrupt
    AwaitingFirstInterrupt,
    /// Interrupt took effect; summarization requested from the host
    Summarizing,
    /// Waiting for the host to report that the summary replaced history
    AwaitingCompactionNotice,
    /// Compaction notice received; quiescing before the final send
    CompactionConfirmed,
    /// Quiescent; the next idle delivers the stored text
    ReadyToSend,
}

/// Events a live compaction can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// `turn_idle` notification for the owning conversation
    TurnIdle,
    /// `history_compacted` notification for the owning conversation
    HistoryCompacted,
    /// The summarize call was accepted by the host
    SummarizeAccepted,
    /// The post-compaction quiescing interrupt was accepted by the host
    QuiesceInterrupted,
}

/// Outcome of applying an event to a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move to the successor phase
    Next(CompactionPhase),
    /// Terminal step: deliver the stored text and delete the state
    Deliver,
    /// The event does not match this phase; ignore it
    Reject,
}

/// Transition function. Exact-predecessor match or reject; rejection is
/// a no-op for the caller, never an error.
pub fn advance(phase: CompactionPhase, event: PhaseEvent) -> Advance {
    use CompactionPhase::*;
    use PhaseEvent::*;

    match (phase, event) {
        (AwaitingFirstInterrupt, TurnIdle) => Advance::Next(Summarizing),
        (Summarizing, SummarizeAccepted) => Advance::Next(AwaitingCompactionNotice),
        (AwaitingCompactionNotice, HistoryCompacted) => Advance::Next(CompactionConfirmed),
        (CompactionConfirmed, QuiesceInterrupted) => Advance::Next(ReadyToSend),
        (ReadyToSend, TurnIdle) => Advance::Deliver,
        _ => Advance::Reject,
    }
}

/// Per-conversation record of an in-flight compact-then-send.
///
/// Created by the compact request body, destroyed on completion, on any
/// host-call failure, or when a newer compact request supersedes it.
#[derive(Debug, Clone)]
pub struct CompactionState {
    pub phase: CompactionPhase,
    /// Engine that produced the latest assistant turn; summarize targets it
    pub engine: EngineHint,
    /// Agent that should receive the stored text after compaction
    pub agent: Option<String>,
    /// Text to deliver once the sequence completes
    pub text: String,
}

impl CompactionState {
    pub fn new(engine: EngineHint, agent: Option<String>, text: impl Into<String>) -> Self {
        Self {
            phase: CompactionPhase::AwaitingFirstInterrupt,
            engine,
            agent,
            text: text.into(),
        }
    }
}
