use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{
    CompleteInput, ConfidenceResult, EscalationReason, RagStrategy, ScoreResult, SessionState,
};

/// Snapshot returned by `get_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionStatus {
    pub session_id: String,
    pub state: SessionState,
    pub current_strategy: Option<RagStrategy>,
    pub latest_scores: Option<ScoreResult>,
    pub latest_confidence: Option<ConfidenceResult>,
    pub attempt_count: u32,
    pub escalation: Option<EscalationReason>,
    pub complete_input: Option<CompleteInput>,
    pub last_activity: DateTime<Utc>,
}

/// Acknowledgement of a validation or cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ack {
    pub session_id: String,
    /// State after the call was applied.
    pub state: SessionState,
}

/// A reviewer's verdict on the pending attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Validation {
    pub approved: bool,
    pub feedback: Option<String>,
}

impl Validation {
    pub fn approve() -> Self {
        Self {
            approved: true,
            feedback: None,
        }
    }

    pub fn reject(feedback: impl Into<String>) -> Self {
        Self {
            approved: false,
            feedback: Some(feedback.into()),
        }
    }
}
