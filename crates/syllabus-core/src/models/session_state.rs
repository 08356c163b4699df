use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::RagStrategy;

/// Refinement state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initial,
    Generated,
    AwaitingValidation,
    Approved,
    Rejected,
    Refining,
    Escalated,
    Expired,
    Cancelled,
}

impl SessionState {
    pub const ALL: [SessionState; 9] = [
        SessionState::Initial,
        SessionState::Generated,
        SessionState::AwaitingValidation,
        SessionState::Approved,
        SessionState::Rejected,
        SessionState::Refining,
        SessionState::Escalated,
        SessionState::Expired,
        SessionState::Cancelled,
    ];

    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Approved
                | SessionState::Escalated
                | SessionState::Expired
                | SessionState::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Initial => "initial",
            SessionState::Generated => "generated",
            SessionState::AwaitingValidation => "awaiting_validation",
            SessionState::Approved => "approved",
            SessionState::Rejected => "rejected",
            SessionState::Refining => "refining",
            SessionState::Escalated => "escalated",
            SessionState::Expired => "expired",
            SessionState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session ended without a Complete Input. Every reason requires
/// manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EscalationReason {
    /// The attempt bound was reached with at least one confidently generated attempt.
    AttemptsExhausted { attempts: u32 },
    /// Every attempt failed confidence.
    StrategyExhausted {
        attempts: u32,
        last_strategy: RagStrategy,
    },
    /// A forced strategy change was needed past `adaptive`.
    NoStrategyRemaining { last_strategy: RagStrategy },
    /// No validation arrived within the inactivity window.
    ValidationTimeout { idle_secs: i64 },
    /// Retrieval features failed validation.
    InvalidInput { detail: String },
}

impl EscalationReason {
    pub fn name(&self) -> &'static str {
        match self {
            EscalationReason::AttemptsExhausted { .. } => "attempts_exhausted",
            EscalationReason::StrategyExhausted { .. } => "strategy_exhausted",
            EscalationReason::NoStrategyRemaining { .. } => "no_strategy_remaining",
            EscalationReason::ValidationTimeout { .. } => "validation_timeout",
            EscalationReason::InvalidInput { .. } => "invalid_input",
        }
    }

    /// Human-readable message for reviewers.
    pub fn message(&self) -> String {
        match self {
            EscalationReason::AttemptsExhausted { attempts } => {
                format!("no approval after {attempts} attempts; requires manual review")
            }
            EscalationReason::StrategyExhausted {
                attempts,
                last_strategy,
            } => format!(
                "confidence stayed below threshold for {attempts} attempts (last strategy: {last_strategy}); requires manual review"
            ),
            EscalationReason::NoStrategyRemaining { last_strategy } => format!(
                "{last_strategy} rejected repeatedly and no strategy remains; requires manual review"
            ),
            EscalationReason::ValidationTimeout { idle_secs } => {
                format!("no validation received for {idle_secs}s; requires manual review")
            }
            EscalationReason::InvalidInput { detail } => {
                format!("invalid retrieval features ({detail}); requires manual review")
            }
        }
    }
}
