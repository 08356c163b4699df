//! Append-only log of refinement records.

use serde::{Deserialize, Serialize};
use syllabus_core::models::{
    ConfidenceScores, CurriculumDraft, RagStrategy, RefinementAttempt, SessionState, UserDecision,
};

/// Ordered transition records. The only mutation is [`AttemptLog::append`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptLog {
    records: Vec<RefinementAttempt>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, record: RefinementAttempt) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RefinementAttempt] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&RefinementAttempt> {
        self.records.last()
    }

    /// Number of generated attempts.
    pub fn attempt_count(&self) -> u32 {
        self.generated().count() as u32
    }

    /// One record per generated attempt, in order.
    pub fn generated(&self) -> impl Iterator<Item = &RefinementAttempt> {
        self.records
            .iter()
            .filter(|r| r.to_state == SessionState::Generated)
    }

    /// Records carrying a confidence result, one per attempt.
    pub fn scored(&self) -> impl Iterator<Item = &RefinementAttempt> {
        self.records
            .iter()
            .filter(|r| r.to_state == SessionState::AwaitingValidation && r.confidence.is_some())
    }

    pub fn content_for(&self, attempt: u32) -> Option<&CurriculumDraft> {
        self.generated()
            .find(|r| r.attempt_index == attempt)
            .and_then(|r| r.content.as_ref())
    }

    pub fn confidence_for(&self, attempt: u32) -> Option<ConfidenceScores> {
        self.scored()
            .find(|r| r.attempt_index == attempt)
            .and_then(|r| r.confidence.as_ref())
            .map(|c| c.scores())
    }

    pub fn strategy_for(&self, attempt: u32) -> Option<RagStrategy> {
        self.generated()
            .find(|r| r.attempt_index == attempt)
            .and_then(|r| r.strategy)
    }

    /// `{C_r, C_g, C_overall}` of every scored attempt, in order.
    pub fn confidence_history(&self) -> Vec<ConfidenceScores> {
        self.scored()
            .filter_map(|r| r.confidence.as_ref().map(|c| c.scores()))
            .collect()
    }

    /// Strategies of attempts whose confidence fell below threshold.
    pub fn low_confidence_strategies(&self) -> Vec<RagStrategy> {
        self.scored()
            .filter(|r| r.confidence.as_ref().is_some_and(|c| c.needs_reroute()))
            .filter_map(|r| r.strategy)
            .collect()
    }

    /// At least one attempt was scored and all of them fell below threshold.
    pub fn all_failed_confidence(&self) -> bool {
        let mut scored = self.scored().peekable();
        scored.peek().is_some()
            && scored.all(|r| r.confidence.as_ref().is_some_and(|c| c.needs_reroute()))
    }

    /// Strategies of rejected attempts, most recent last.
    pub fn rejected_strategies(&self) -> Vec<RagStrategy> {
        self.records
            .iter()
            .filter(|r| r.user_decision == UserDecision::Rejected)
            .filter_map(|r| r.strategy)
            .collect()
    }

    /// Attempt index approved by the reviewer, if any.
    pub fn approved_attempt(&self) -> Option<u32> {
        self.records
            .iter()
            .rev()
            .find(|r| r.user_decision == UserDecision::Approved)
            .map(|r| r.attempt_index)
    }
}
