use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{
    CompleteInput, ConfidenceResult, EscalationReason, RagStrategy, RerouteAction,
    StrategyDecision, TaskAnalysis,
};

/// Payload of a session event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    InputAnalysis {
        analysis: TaskAnalysis,
    },
    StrategySelected {
        attempt: u32,
        decision: StrategyDecision,
    },
    GenerationComplete {
        attempt: u32,
        strategy: RagStrategy,
        token_usage: u32,
        degraded: bool,
    },
    ConfidenceComputed {
        attempt: u32,
        confidence: ConfidenceResult,
    },
    ValidationRequested {
        attempt: u32,
        low_confidence: bool,
        reroute: RerouteAction,
    },
    RefinementStarted {
        /// The attempt about to run.
        attempt: u32,
        feedback: Option<String>,
        reroute: RerouteAction,
        forced_strategy: Option<RagStrategy>,
    },
    Complete {
        complete_input: CompleteInput,
    },
    Escalated {
        reason: EscalationReason,
        message: String,
    },
    Cancelled,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::InputAnalysis { .. } => "input_analysis",
            EventKind::StrategySelected { .. } => "strategy_selected",
            EventKind::GenerationComplete { .. } => "generation_complete",
            EventKind::ConfidenceComputed { .. } => "confidence_computed",
            EventKind::ValidationRequested { .. } => "validation_requested",
            EventKind::RefinementStarted { .. } => "refinement_started",
            EventKind::Complete { .. } => "complete",
            EventKind::Escalated { .. } => "escalated",
            EventKind::Cancelled => "cancelled",
        }
    }

    /// Events after which a session emits nothing further.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            EventKind::Complete { .. } | EventKind::Escalated { .. } | EventKind::Cancelled
        )
    }
}

/// One entry of a session's ordered event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionEvent {
    pub session_id: String,
    /// Per-session sequence number, starting at 1.
    pub seq: u32,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}
