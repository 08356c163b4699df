use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ConfidenceResult, CurriculumDraft, RagStrategy, SessionState};
use crate::errors::ServiceKind;

/// Reviewer verdict on an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserDecision {
    Pending,
    Approved,
    Rejected,
}

/// Who produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Reviewer,
    Monitor,
    System,
}

/// A collaborator that was unavailable during an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DegradedInfo {
    pub service: ServiceKind,
    pub reason: String,
    pub tries: u32,
}

/// One append-only log record. Each state transition writes exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RefinementAttempt {
    /// Generation attempt this record belongs to; 0 before the first generation.
    pub attempt_index: u32,
    pub strategy: Option<RagStrategy>,
    pub content: Option<CurriculumDraft>,
    pub confidence: Option<ConfidenceResult>,
    pub user_decision: UserDecision,
    pub decided_by: Option<DecisionSource>,
    pub feedback: Option<String>,
    pub from_state: SessionState,
    pub to_state: SessionState,
    pub trigger: String,
    pub degraded: Vec<DegradedInfo>,
    pub content_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RefinementAttempt {
    /// A bare transition record; callers fill in what the transition carries.
    pub fn transition(
        attempt_index: u32,
        from_state: SessionState,
        to_state: SessionState,
        trigger: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            attempt_index,
            strategy: None,
            content: None,
            confidence: None,
            user_decision: UserDecision::Pending,
            decided_by: None,
            feedback: None,
            from_state,
            to_state,
            trigger: trigger.into(),
            degraded: Vec::new(),
            content_hash: None,
            timestamp,
        }
    }

    pub fn with_strategy(mut self, strategy: RagStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_content(mut self, content: CurriculumDraft) -> Self {
        self.content_hash = Some(content.content_hash());
        self.content = Some(content);
        self
    }

    pub fn with_confidence(mut self, confidence: ConfidenceResult) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_decision(
        mut self,
        decision: UserDecision,
        source: DecisionSource,
        feedback: Option<String>,
    ) -> Self {
        self.user_decision = decision;
        self.decided_by = Some(source);
        self.feedback = feedback;
        self
    }

    pub fn with_degraded(mut self, degraded: Vec<DegradedInfo>) -> Self {
        self.degraded = degraded;
        self
    }
}
