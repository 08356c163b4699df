//! A single request's refinement session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use syllabus_core::config::RefinementConfig;
use syllabus_core::errors::RefinementError;
use syllabus_core::models::{
    CompleteInput, ConfidenceResult, CurriculumDraft, EscalationReason, EventKind, ForceReason,
    RagStrategy, RefinementAttempt, Request, RerouteAction, RetrievalFeatures, ScoreResult,
    SessionEvent, SessionState, SessionStatus, StrategyDecision, TaskAnalysis,
};

use crate::log::AttemptLog;
use crate::state::{self, Trigger};

/// Owns the request, the FSM state, the attempt log, and the event stream.
///
/// State changes go through [`crate::RefinementController`]; everything else
/// is read through accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: String,
    pub(crate) request: Request,
    pub(crate) state: SessionState,
    pub(crate) max_attempts: u32,
    /// Current attempt index; 0 before the first generation.
    pub(crate) attempt: u32,
    /// Reviewer feedback, appended to every later query.
    pub(crate) constraints: Vec<String>,
    pub(crate) log: AttemptLog,
    pub(crate) events: Vec<SessionEvent>,
    pub(crate) analysis: Option<TaskAnalysis>,
    pub(crate) decision: Option<StrategyDecision>,
    pub(crate) latest_scores: Option<ScoreResult>,
    pub(crate) latest_features: Option<RetrievalFeatures>,
    pub(crate) latest_draft: Option<CurriculumDraft>,
    pub(crate) latest_confidence: Option<ConfidenceResult>,
    /// Query text; replaced when the monitor asks for a rewrite.
    pub(crate) query_text: String,
    pub(crate) query_rewritten: bool,
    pub(crate) top_k: usize,
    /// Reroute action carried into the next attempt.
    pub(crate) pending_reroute: RerouteAction,
    /// Strategy the policy forces on the next attempt.
    pub(crate) forced: Option<(RagStrategy, ForceReason)>,
    pub(crate) escalation: Option<EscalationReason>,
    pub(crate) complete_input: Option<CompleteInput>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        request: Request,
        config: &RefinementConfig,
        top_k: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let query_text = request.query_text();
        Self {
            id: id.into(),
            request,
            state: SessionState::Initial,
            max_attempts: config.max_attempts,
            attempt: 0,
            constraints: Vec::new(),
            log: AttemptLog::new(),
            events: Vec::new(),
            analysis: None,
            decision: None,
            latest_scores: None,
            latest_features: None,
            latest_draft: None,
            latest_confidence: None,
            query_text,
            query_rewritten: false,
            top_k,
            pending_reroute: RerouteAction::None,
            forced: None,
            escalation: None,
            complete_input: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn user_id(&self) -> Option<&str> {
        self.request.user_id.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn current_attempt(&self) -> u32 {
        self.attempt
    }

    pub fn attempt_count(&self) -> u32 {
        self.log.attempt_count()
    }

    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    pub fn log(&self) -> &AttemptLog {
        &self.log
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Events with `seq > since_seq`, in order.
    pub fn events_since(&self, since_seq: u32) -> &[SessionEvent] {
        let start = self.events.partition_point(|e| e.seq <= since_seq);
        &self.events[start..]
    }

    pub fn analysis(&self) -> Option<&TaskAnalysis> {
        self.analysis.as_ref()
    }

    pub fn decision(&self) -> Option<&StrategyDecision> {
        self.decision.as_ref()
    }

    pub fn current_strategy(&self) -> Option<RagStrategy> {
        self.decision.as_ref().map(|d| d.strategy)
    }

    pub fn latest_scores(&self) -> Option<&ScoreResult> {
        self.latest_scores.as_ref()
    }

    pub fn latest_draft(&self) -> Option<&CurriculumDraft> {
        self.latest_draft.as_ref()
    }

    pub fn latest_confidence(&self) -> Option<&ConfidenceResult> {
        self.latest_confidence.as_ref()
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn forced_strategy(&self) -> Option<(RagStrategy, ForceReason)> {
        self.forced
    }

    pub fn escalation(&self) -> Option<&EscalationReason> {
        self.escalation.as_ref()
    }

    pub fn complete_input(&self) -> Option<&CompleteInput> {
        self.complete_input.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Seconds since the last state change or event.
    pub fn idle_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity).num_seconds()
    }

    pub fn set_analysis(&mut self, analysis: TaskAnalysis) {
        self.analysis = Some(analysis);
    }

    /// Append an event to the ordered stream and return it.
    pub fn record_event(&mut self, kind: EventKind, now: DateTime<Utc>) -> SessionEvent {
        let seq = self.events.last().map_or(1, |e| e.seq + 1);
        let event = SessionEvent {
            session_id: self.id.clone(),
            seq,
            timestamp: now,
            kind,
        };
        self.events.push(event.clone());
        self.last_activity = now;
        event
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id.clone(),
            state: self.state,
            current_strategy: self.current_strategy(),
            latest_scores: self.latest_scores.clone(),
            latest_confidence: self.latest_confidence.clone(),
            attempt_count: self.attempt_count(),
            escalation: self.escalation.clone(),
            complete_input: self.complete_input.clone(),
            last_activity: self.last_activity,
        }
    }

    /// Apply `trigger` through the transition table and log the record
    /// produced by `build`, which receives a bare transition record.
    pub(crate) fn apply(
        &mut self,
        trigger: Trigger,
        now: DateTime<Utc>,
        build: impl FnOnce(RefinementAttempt) -> RefinementAttempt,
    ) -> Result<SessionState, RefinementError> {
        let from = self.state;
        let to = state::transition(from, trigger)?;
        let mut record = RefinementAttempt::transition(self.attempt, from, to, trigger.as_str(), now);
        if let Some(strategy) = self.current_strategy() {
            record = record.with_strategy(strategy);
        }
        self.log.append(build(record));
        self.state = to;
        self.last_activity = now;
        tracing::debug!(
            session_id = %self.id,
            from = %from,
            to = %to,
            trigger = %trigger,
            attempt = self.attempt,
            "session transition"
        );
        Ok(to)
    }
}
