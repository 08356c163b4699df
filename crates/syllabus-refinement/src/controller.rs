//! Drives a session through the refinement state machine.
//!
//! The controller never talks to collaborators. The caller runs retrieval and
//! generation for an [`AttemptPlan`] and hands the [`AttemptOutcome`] back.

use chrono::{DateTime, Utc};

use syllabus_core::config::{RefinementConfig, RetrievalConfig};
use syllabus_core::errors::{RefinementError, SyllabusError, SyllabusResult};
use syllabus_core::models::{
    CompleteInput, ConfidenceResult, CurriculumDraft, DecisionSource, DegradedInfo,
    EscalationReason, EventKind, ForceReason, RagStrategy, Request, RerouteAction,
    RetrievalFeatures, RetrievalFilters, RetrievalQuery, ScoreResult, SessionState,
    StrategyDecision, UserDecision,
};

use crate::assembler::CompleteInputAssembler;
use crate::policy::{self, RefinementPlan};
use crate::session::Session;
use crate::state::Trigger;

/// Inputs for the next attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptPlan {
    /// Index the attempt will get once generated.
    pub attempt: u32,
    pub query: RetrievalQuery,
    /// Features to reuse instead of querying retrieval again.
    pub reuse_features: Option<RetrievalFeatures>,
    pub forced: Option<(RagStrategy, ForceReason)>,
    pub reroute: RerouteAction,
}

/// What one attempt produced.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub decision: StrategyDecision,
    pub scores: ScoreResult,
    pub features: RetrievalFeatures,
    pub draft: CurriculumDraft,
    pub token_usage: u32,
    pub degraded: Vec<DegradedInfo>,
}

/// Where the session stands after a controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// Waiting for a reviewer.
    AwaitValidation,
    /// Another attempt should run.
    Continue,
    Escalated(EscalationReason),
}

#[derive(Debug, Clone, Default)]
pub struct RefinementController {
    config: RefinementConfig,
    retrieval: RetrievalConfig,
    assembler: CompleteInputAssembler,
}

impl RefinementController {
    pub fn new(config: RefinementConfig, retrieval: RetrievalConfig) -> Self {
        Self {
            config,
            retrieval,
            assembler: CompleteInputAssembler::new(),
        }
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Fresh session with this controller's limits.
    pub fn open(
        &self,
        id: impl Into<String>,
        request: Request,
        now: DateTime<Utc>,
    ) -> Session {
        Session::new(id, request, &self.config, self.retrieval.default_top_k, now)
    }

    /// Shape the next attempt from the pending reroute action.
    pub fn plan_attempt(&self, session: &mut Session) -> Result<AttemptPlan, RefinementError> {
        if !matches!(session.state, SessionState::Initial | SessionState::Refining) {
            return Err(RefinementError::InvalidTransition {
                from: session.state,
                trigger: Trigger::Generate.to_string(),
            });
        }

        let reroute = session.pending_reroute;
        let mut reuse_features = None;
        match reroute {
            RerouteAction::ExpandSearch => {
                let expanded = session
                    .top_k
                    .saturating_mul(self.retrieval.expansion_factor.max(1));
                session.top_k = expanded.min(self.retrieval.max_top_k).max(session.top_k);
            }
            RerouteAction::RewriteQuery => {
                session.query_text = rewrite_query(session);
                session.query_rewritten = true;
            }
            RerouteAction::Regenerate => {
                reuse_features = session.latest_features.clone();
            }
            RerouteAction::SwitchStrategy | RerouteAction::None => {}
        }

        let info = &session.request.basic_info;
        let query = RetrievalQuery {
            text: session.query_text.clone(),
            filters: RetrievalFilters {
                subject: info.subject.clone(),
                grade: info.grade.clone(),
                phase: info.phase.clone(),
            },
            constraints: session.constraints.clone(),
            top_k: session.top_k,
            strategy_hint: session.forced.map(|(s, _)| s),
            rewritten: session.query_rewritten,
        };

        Ok(AttemptPlan {
            attempt: session.attempt + 1,
            query,
            reuse_features,
            forced: session.forced,
            reroute,
        })
    }

    /// Record a selected strategy before generation runs.
    pub fn record_selection(
        &self,
        session: &mut Session,
        decision: StrategyDecision,
        scores: ScoreResult,
        now: DateTime<Utc>,
    ) {
        let attempt = session.attempt + 1;
        session.latest_scores = Some(scores);
        session.decision = Some(decision.clone());
        session.record_event(EventKind::StrategySelected { attempt, decision }, now);
    }

    /// `Initial | Refining → Generated`.
    pub fn record_generation(
        &self,
        session: &mut Session,
        outcome: AttemptOutcome,
        now: DateTime<Utc>,
    ) -> Result<(), RefinementError> {
        crate::state::transition(session.state, Trigger::Generate)?;

        session.attempt += 1;
        session.decision = Some(outcome.decision.clone());
        session.latest_scores = Some(outcome.scores);
        session.latest_features = Some(outcome.features);
        session.latest_draft = Some(outcome.draft.clone());
        session.pending_reroute = RerouteAction::None;
        session.forced = None;

        let degraded = !outcome.degraded.is_empty();
        let draft = outcome.draft;
        let degraded_info = outcome.degraded;
        session.apply(Trigger::Generate, now, |r| {
            r.with_content(draft).with_degraded(degraded_info)
        })?;

        let attempt = session.attempt;
        session.record_event(
            EventKind::GenerationComplete {
                attempt,
                strategy: outcome.decision.strategy,
                token_usage: outcome.token_usage,
                degraded,
            },
            now,
        );
        Ok(())
    }

    /// `Generated → AwaitingValidation`. With auto-reroute on, a low
    /// confidence attempt is rejected on the monitor's behalf.
    pub fn record_confidence(
        &self,
        session: &mut Session,
        confidence: ConfidenceResult,
        now: DateTime<Utc>,
    ) -> Result<NextStep, RefinementError> {
        let record_confidence = confidence.clone();
        session.apply(Trigger::ConfidenceComputed, now, |r| {
            r.with_confidence(record_confidence)
        })?;
        session.latest_confidence = Some(confidence.clone());

        let attempt = session.attempt;
        session.record_event(
            EventKind::ConfidenceComputed {
                attempt,
                confidence: confidence.clone(),
            },
            now,
        );
        let low_confidence = confidence.needs_reroute();
        session.record_event(
            EventKind::ValidationRequested {
                attempt,
                low_confidence,
                reroute: confidence.reroute,
            },
            now,
        );

        if low_confidence && self.config.auto_reroute {
            let feedback = format!(
                "confidence {:.2} below threshold; {}",
                confidence.c_overall, confidence.reroute
            );
            return self.reject_with(session, Some(feedback), DecisionSource::Monitor, now);
        }
        Ok(NextStep::AwaitValidation)
    }

    /// Reviewer approval: `AwaitingValidation → Approved`, then assembly.
    ///
    /// Assembly is checked before the transition, so a draft that cannot be
    /// assembled leaves the session awaiting validation.
    pub fn approve(&self, session: &mut Session, now: DateTime<Utc>) -> SyllabusResult<CompleteInput> {
        crate::state::transition(session.state, Trigger::Approve)?;
        let attempt = session.attempt;
        let input = self.assembler.assemble_with(session, Some(attempt), now)?;

        session.apply(Trigger::Approve, now, |r| {
            r.with_decision(UserDecision::Approved, DecisionSource::Reviewer, None)
        })?;
        self.finish(session, input.clone(), now);
        Ok(input)
    }

    /// Reviewer rejection with feedback.
    pub fn reject(
        &self,
        session: &mut Session,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<NextStep, RefinementError> {
        self.reject_with(session, feedback, DecisionSource::Reviewer, now)
    }

    fn reject_with(
        &self,
        session: &mut Session,
        feedback: Option<String>,
        source: DecisionSource,
        now: DateTime<Utc>,
    ) -> Result<NextStep, RefinementError> {
        let feedback = feedback.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        let record_feedback = feedback.clone();
        session.apply(Trigger::Reject, now, |r| {
            r.with_decision(UserDecision::Rejected, source, record_feedback)
        })?;

        // Monitor notes are not query constraints.
        if source == DecisionSource::Reviewer {
            if let Some(text) = &feedback {
                session.constraints.push(text.clone());
            }
        }
        session.apply(Trigger::Refine, now, |r| r)?;

        let last_reroute = session
            .latest_confidence
            .as_ref()
            .map_or(RerouteAction::None, |c| c.reroute);

        match policy::plan(&session.log, last_reroute, &self.config) {
            RefinementPlan::Escalate(reason) => {
                self.escalate(session, reason.clone(), now)?;
                Ok(NextStep::Escalated(reason))
            }
            RefinementPlan::Continue { forced, reroute } => {
                session.pending_reroute = reroute;
                session.forced = forced;
                let attempt = session.attempt + 1;
                session.record_event(
                    EventKind::RefinementStarted {
                        attempt,
                        feedback,
                        reroute,
                        forced_strategy: forced.map(|(s, _)| s),
                    },
                    now,
                );
                tracing::debug!(
                    session_id = %session.id,
                    attempt,
                    reroute = %reroute,
                    forced = ?forced.map(|(s, _)| s),
                    "refinement started"
                );
                Ok(NextStep::Continue)
            }
        }
    }

    /// Pre-supplied CP/ATP: `Initial → Approved` without generation.
    pub fn complete_supplied(
        &self,
        session: &mut Session,
        now: DateTime<Utc>,
    ) -> SyllabusResult<CompleteInput> {
        crate::state::transition(session.state, Trigger::Supplied)?;
        let input = self.assembler.assemble_with(session, None, now)?;
        session.apply(Trigger::Supplied, now, |r| {
            r.with_decision(UserDecision::Approved, DecisionSource::System, None)
        })?;
        self.finish(session, input.clone(), now);
        Ok(input)
    }

    /// Move to `Escalated` from `Initial` or `Refining`.
    pub fn escalate(
        &self,
        session: &mut Session,
        reason: EscalationReason,
        now: DateTime<Utc>,
    ) -> Result<(), RefinementError> {
        let note = reason.message();
        session.apply(Trigger::Escalate, now, |r| {
            r.with_decision(UserDecision::Pending, DecisionSource::System, Some(note))
        })?;
        self.record_escalation(session, reason, now);
        Ok(())
    }

    /// Inactivity timeout: `AwaitingValidation → Expired`.
    pub fn expire(&self, session: &mut Session, now: DateTime<Utc>) -> Result<(), RefinementError> {
        let idle_secs = session.idle_secs(now);
        let reason = EscalationReason::ValidationTimeout { idle_secs };
        let note = reason.message();
        session.apply(Trigger::Expire, now, |r| {
            r.with_decision(UserDecision::Pending, DecisionSource::System, Some(note))
        })?;
        self.record_escalation(session, reason, now);
        Ok(())
    }

    pub fn cancel(&self, session: &mut Session, now: DateTime<Utc>) -> Result<(), RefinementError> {
        session.apply(Trigger::Cancel, now, |r| r)?;
        session.record_event(EventKind::Cancelled, now);
        tracing::info!(session_id = %session.id, "session cancelled");
        Ok(())
    }

    /// Escalate after the score engine rejected the retrieval features.
    pub fn escalate_invalid_input(
        &self,
        session: &mut Session,
        error: &SyllabusError,
        now: DateTime<Utc>,
    ) -> Result<EscalationReason, RefinementError> {
        let reason = EscalationReason::InvalidInput {
            detail: error.root().to_string(),
        };
        self.escalate(session, reason.clone(), now)?;
        Ok(reason)
    }

    fn finish(&self, session: &mut Session, input: CompleteInput, now: DateTime<Utc>) {
        session.complete_input = Some(input.clone());
        session.record_event(
            EventKind::Complete {
                complete_input: input,
            },
            now,
        );
        tracing::debug!(
            session_id = %session.id,
            attempts = session.attempt_count(),
            "session complete"
        );
    }

    fn record_escalation(&self, session: &mut Session, reason: EscalationReason, now: DateTime<Utc>) {
        let message = reason.message();
        session.escalation = Some(reason.clone());
        tracing::debug!(
            session_id = %session.id,
            reason = reason.name(),
            "session escalated"
        );
        session.record_event(EventKind::Escalated { reason, message }, now);
    }
}

/// Restate the request around its topic, for a retrieval that missed.
fn rewrite_query(session: &Session) -> String {
    let info = &session.request.basic_info;
    let parts = [
        info.topic.trim(),
        info.subtopic.trim(),
        info.subject.trim(),
        "fase",
        info.phase.trim(),
        "kelas",
        info.grade.trim(),
        "capaian pembelajaran",
    ];
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
