//! [`OrchestrationEngine`]: request intake, the attempt pipeline, reviewer
//! validation, cancellation, and the per-session event stream.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use syllabus_confidence::{ConfidenceInput, ConfidenceMonitor};
use syllabus_core::config::SyllabusConfig;
use syllabus_core::constants::new_session_id;
use syllabus_core::errors::{
    AssemblyError, RefinementError, ServiceKind, SessionError, SyllabusError, SyllabusResult,
};
use syllabus_core::models::{
    Ack, CurriculumDraft, DegradedInfo, EscalationReason, EventKind, GenerationRequest, Request,
    SessionEvent, SessionState, SessionStatus, Validation,
};
use syllabus_core::traits::{IClock, IEventSink, IGenerationService, IRetrievalService, SystemClock};
use syllabus_observability::tracing_setup::events;
use syllabus_observability::{
    attempt_span, confidence_span, scoring_span, session_span, evaluate_alerts, DegradationAlert,
    DegradationTracker, OrchestrationMetrics,
};
use syllabus_refinement::{AttemptOutcome, NextStep, RefinementController, Session};
use syllabus_scoring::{QueryProfile, ScoreEngine, StrategySelector, TaskAnalyzer};
use syllabus_session::{
    enforce_user_cap, expire_idle, purge_archive, RegistryStats, SessionRegistry, SessionSlot,
};

use crate::prompt::build_prompt;
use crate::retry::{Exhausted, RetryPolicy};

/// Orchestrates sessions from request to Complete Input or escalation.
///
/// Every call is synchronous. Sessions are independent; calls on different
/// sessions may run on different threads.
pub struct OrchestrationEngine {
    config: SyllabusConfig,
    analyzer: TaskAnalyzer,
    scorer: ScoreEngine,
    selector: StrategySelector,
    monitor: ConfidenceMonitor,
    controller: RefinementController,
    registry: SessionRegistry,
    retry: RetryPolicy,
    retrieval: Arc<dyn IRetrievalService>,
    generation: Arc<dyn IGenerationService>,
    sink: Option<Arc<dyn IEventSink>>,
    clock: Arc<dyn IClock>,
    metrics: Mutex<OrchestrationMetrics>,
    degradation: Mutex<DegradationTracker>,
}

impl OrchestrationEngine {
    pub fn new(
        config: SyllabusConfig,
        retrieval: Arc<dyn IRetrievalService>,
        generation: Arc<dyn IGenerationService>,
    ) -> Self {
        Self {
            analyzer: TaskAnalyzer::new(),
            scorer: ScoreEngine::new(config.scoring.clone()),
            selector: StrategySelector::new(config.selection.clone()),
            monitor: ConfidenceMonitor::new(config.confidence.clone()),
            controller: RefinementController::new(config.refinement.clone(), config.retrieval.clone()),
            registry: SessionRegistry::new(config.session.clone()),
            retry: RetryPolicy::new(config.retry.clone()),
            retrieval,
            generation,
            sink: None,
            clock: Arc::new(SystemClock),
            metrics: Mutex::new(OrchestrationMetrics::new()),
            degradation: Mutex::new(DegradationTracker::new()),
            config,
        }
    }

    /// Push every session event to `sink` as it is recorded.
    pub fn with_event_sink(mut self, sink: Arc<dyn IEventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn IClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SyllabusConfig {
        &self.config
    }

    // ── Exposed operations ──

    /// Validate the request, open a session, and run it until it needs a
    /// reviewer or finishes. A request with missing basic info creates no
    /// session.
    pub fn submit_request(&self, request: Request) -> SyllabusResult<String> {
        let missing = request.basic_info.missing_fields();
        if !missing.is_empty() {
            return Err(AssemblyError::IncompleteInput { missing }.into());
        }

        let now = self.clock.now();
        if let Some(user_id) = request.user_id.clone() {
            let cancelled = enforce_user_cap(&self.registry, &self.controller, &user_id, 1, now)?;
            for id in &cancelled {
                self.metric(|m| m.session_finished(SessionState::Cancelled, false));
                self.publish_last(id)?;
            }
        }

        let analysis = self.analyzer.analyze(&request);
        let session_id = new_session_id();
        let span = session_span!(session_id);
        let _guard = span.enter();

        events::session_started(
            &session_id,
            analysis.orchestration.as_str(),
            analysis.complexity_level.as_str(),
        );
        let mut session = self.controller.open(session_id.clone(), request, now);
        session.set_analysis(analysis.clone());
        session.record_event(EventKind::InputAnalysis { analysis }, now);
        self.metric(|m| m.session_started());

        let slot = self.registry.insert(session);
        let (state, result) = {
            let mut session = slot.lock()?;
            let result = self.run_pending(&slot, &mut session);
            self.publish(session.events());
            (session.state(), result)
        };
        self.archive_if_terminal(&session_id, state)?;
        result?;
        Ok(session_id)
    }

    /// Current state, scores, confidence, and result of a session.
    pub fn get_status(&self, session_id: &str) -> SyllabusResult<SessionStatus> {
        let slot = self.registry.get(session_id)?;
        let (status, state) = {
            let mut session = slot.lock()?;
            let from = last_seq(&session);
            self.expire_if_idle(&mut session, self.clock.now())?;
            self.publish(session.events_since(from));
            (session.status(), session.state())
        };
        self.archive_if_terminal(session_id, state)?;
        Ok(status)
    }

    /// Apply a reviewer's verdict. A rejection runs the next attempt before
    /// returning. Verdicts on a cancelled session are acknowledged and ignored.
    pub fn submit_validation(&self, session_id: &str, validation: Validation) -> SyllabusResult<Ack> {
        let slot = self.registry.get(session_id)?;
        let span = session_span!(session_id);
        let _guard = span.enter();

        let (state, result) = {
            let mut session = slot.lock()?;
            let from = last_seq(&session);
            let result = self.apply_validation(&slot, &mut session, validation);
            self.publish(session.events_since(from));
            (session.state(), result)
        };
        self.archive_if_terminal(session_id, state)?;
        result?;
        Ok(Ack {
            session_id: session_id.to_string(),
            state,
        })
    }

    /// Cancel a session. A pipeline running on another thread stops at its
    /// next step and discards collaborator results. Cancelling a finished
    /// session is a no-op.
    pub fn cancel(&self, session_id: &str) -> SyllabusResult<Ack> {
        let slot = self.registry.get(session_id)?;
        slot.request_cancel();

        let state = {
            let mut session = slot.lock()?;
            let from = last_seq(&session);
            if !session.is_terminal() {
                self.controller.cancel(&mut session, self.clock.now())?;
                self.metric(|m| m.session_finished(SessionState::Cancelled, false));
            }
            self.publish(session.events_since(from));
            session.state()
        };
        self.archive_if_terminal(session_id, state)?;
        Ok(Ack {
            session_id: session_id.to_string(),
            state,
        })
    }

    /// Raise the cancel flag without waiting for the session lock. A running
    /// pipeline applies it at its next step; otherwise the next call on the
    /// session does.
    pub fn request_cancel(&self, session_id: &str) -> SyllabusResult<()> {
        self.registry.get(session_id)?.request_cancel();
        Ok(())
    }

    /// Ids of sessions not yet archived.
    pub fn live_sessions(&self) -> Vec<String> {
        self.registry.live_ids()
    }

    /// Ordered events with `seq > since_seq`.
    pub fn events(&self, session_id: &str, since_seq: u32) -> SyllabusResult<Vec<SessionEvent>> {
        Ok(self
            .registry
            .with_session(session_id, |s| s.events_since(since_seq).to_vec())?)
    }

    // ── Housekeeping ──

    /// Expire every session idle in `AwaitingValidation` past the timeout.
    pub fn expire_idle(&self) -> SyllabusResult<Vec<String>> {
        let expired = expire_idle(&self.registry, &self.controller, self.clock.now())?;
        for id in &expired {
            self.metric(|m| m.session_finished(SessionState::Expired, false));
            self.publish_last(id)?;
        }
        Ok(expired)
    }

    /// Drop archived sessions past retention.
    pub fn purge_archive(&self) -> SyllabusResult<usize> {
        purge_archive(&self.registry, self.clock.now())
    }

    pub fn stats(&self) -> SyllabusResult<RegistryStats> {
        Ok(self.registry.stats()?)
    }

    pub fn metrics_snapshot(&self) -> SyllabusResult<serde_json::Value> {
        lock(&self.metrics).snapshot()
    }

    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&lock(&self.degradation), self.clock.now())
    }

    // ── Pipeline ──

    /// Run attempts until the session needs a reviewer or finishes.
    fn run_pending(&self, slot: &SessionSlot, session: &mut Session) -> SyllabusResult<()> {
        if session.state() == SessionState::Initial && session.request().has_cp_atp() {
            self.controller.complete_supplied(session, self.clock.now())?;
            self.on_finished(session, true);
            return Ok(());
        }

        while matches!(session.state(), SessionState::Initial | SessionState::Refining) {
            if self.discard_if_cancelled(slot, session)? {
                break;
            }
            self.run_attempt(slot, session)?;
        }
        Ok(())
    }

    fn run_attempt(&self, slot: &SessionSlot, session: &mut Session) -> SyllabusResult<()> {
        let plan = self.controller.plan_attempt(session)?;
        let attempt = plan.attempt;
        let session_id = session.id().to_string();
        let span = attempt_span!(session_id, attempt);
        let _guard = span.enter();
        if attempt > 1 {
            events::refinement_started(&session_id, attempt, plan.reroute);
        }

        let request = session.request().clone();
        let mut degraded = Vec::new();

        let profile = QueryProfile::from_text(&plan.query.full_text());
        let features = match plan.reuse_features {
            Some(features) => features,
            None => match self
                .retry
                .call(ServiceKind::Retrieval, || self.retrieval.query(&plan.query))
            {
                Ok(mut features) => {
                    if features.token_length == 0 {
                        profile.apply_to(&mut features);
                    }
                    self.recovered(ServiceKind::Retrieval);
                    features
                }
                Err(exhausted) => {
                    degraded.push(self.degraded(&session_id, attempt, exhausted, "query profile only"));
                    profile.to_features()
                }
            },
        };
        if self.discard_if_cancelled(slot, session)? {
            return Ok(());
        }

        let scores = {
            let span = scoring_span!(attempt);
            let _guard = span.enter();
            match self.scorer.score(&features) {
                Ok(scores) => scores,
                Err(e) => {
                    let error = SyllabusError::from(e).in_attempt(&session_id, attempt, "score validation");
                    let reason = self
                        .controller
                        .escalate_invalid_input(session, &error, self.clock.now())?;
                    events::session_escalated(&session_id, &reason);
                    self.on_finished(session, false);
                    return Ok(());
                }
            }
        };
        let decision = match plan.forced {
            Some((strategy, reason)) => self.selector.force(strategy, reason, &scores),
            None => self.selector.select(&scores),
        };
        events::strategy_selected(&session_id, attempt, &decision);
        self.controller
            .record_selection(session, decision.clone(), scores.clone(), self.clock.now());

        let strategy = decision.strategy;
        let generation_request = GenerationRequest {
            prompt: build_prompt(&request, strategy, session.constraints(), &features.retrieved_spans),
            context: features.retrieved_spans.clone(),
            model: request.llm_model.clone(),
            strategy,
        };
        let (draft, token_usage) = match self
            .retry
            .call(ServiceKind::Generation, || self.generation.generate(&generation_request))
        {
            Ok(response) => {
                self.recovered(ServiceKind::Generation);
                (CurriculumDraft::parse(&response.text), response.token_usage)
            }
            Err(exhausted) => {
                degraded.push(self.degraded(&session_id, attempt, exhausted, "empty draft"));
                (CurriculumDraft::default(), 0)
            }
        };
        if self.discard_if_cancelled(slot, session)? {
            return Ok(());
        }

        let retrieval_degraded = degraded.iter().any(|d| d.service == ServiceKind::Retrieval);
        let generation_degraded = degraded.iter().any(|d| d.service == ServiceKind::Generation);
        let forced = decision.is_forced();
        let now = self.clock.now();
        self.controller.record_generation(
            session,
            AttemptOutcome {
                decision,
                scores,
                features: features.clone(),
                draft: draft.clone(),
                token_usage,
                degraded,
            },
            now,
        )?;
        self.metric(|m| {
            m.attempt_generated(strategy, forced, retrieval_degraded || generation_degraded, token_usage)
        });

        let failed = session.log().low_confidence_strategies();
        let confidence = {
            let span = confidence_span!(attempt, strategy);
            let _guard = span.enter();
            self.monitor.evaluate(&ConfidenceInput {
                request: &request,
                features: &features,
                draft: &draft,
                strategy,
                failed_strategies: &failed,
                retrieval_degraded,
                generation_degraded,
            })
        };
        events::confidence_computed(&session_id, attempt, &confidence);
        self.metric(|m| m.confidence_recorded(confidence.c_overall, confidence.reroute));

        if let NextStep::Escalated(reason) = self.controller.record_confidence(session, confidence, now)? {
            events::session_escalated(&session_id, &reason);
            self.on_finished(session, false);
        }
        Ok(())
    }

    fn apply_validation(
        &self,
        slot: &SessionSlot,
        session: &mut Session,
        validation: Validation,
    ) -> SyllabusResult<()> {
        if self.discard_if_cancelled(slot, session)? {
            tracing::debug!(session_id = session.id(), "validation after cancel ignored");
            return Ok(());
        }
        let now = self.clock.now();
        self.expire_if_idle(session, now)?;

        match session.state() {
            SessionState::AwaitingValidation => {}
            SessionState::Expired => {
                let idle_secs = match session.escalation() {
                    Some(EscalationReason::ValidationTimeout { idle_secs }) => *idle_secs,
                    _ => session.idle_secs(now),
                };
                return Err(SessionError::Timeout {
                    session_id: session.id().to_string(),
                    idle_secs,
                }
                .into());
            }
            SessionState::Escalated => {
                if let Some(EscalationReason::StrategyExhausted {
                    attempts,
                    last_strategy,
                }) = session.escalation()
                {
                    return Err(RefinementError::StrategyExhausted {
                        attempts: *attempts,
                        last_strategy: *last_strategy,
                    }
                    .into());
                }
                return Err(invalid_validation(session.state(), &validation));
            }
            from => return Err(invalid_validation(from, &validation)),
        }

        if validation.approved {
            self.controller.approve(session, now)?;
            self.on_finished(session, false);
            return Ok(());
        }

        match self.controller.reject(session, validation.feedback, now)? {
            NextStep::Escalated(reason) => {
                events::session_escalated(session.id(), &reason);
                self.on_finished(session, false);
                Ok(())
            }
            NextStep::Continue | NextStep::AwaitValidation => self.run_pending(slot, session),
        }
    }

    // ── Helpers ──

    fn expire_if_idle(&self, session: &mut Session, now: DateTime<Utc>) -> SyllabusResult<()> {
        let timeout = i64::try_from(self.config.session.validation_timeout_secs).unwrap_or(i64::MAX);
        if session.state() == SessionState::AwaitingValidation && session.idle_secs(now) > timeout {
            self.controller.expire(session, now)?;
            self.metric(|m| m.session_finished(SessionState::Expired, false));
        }
        Ok(())
    }

    fn discard_if_cancelled(&self, slot: &SessionSlot, session: &mut Session) -> SyllabusResult<bool> {
        if !slot.cancel_requested() || session.is_terminal() {
            return Ok(session.state() == SessionState::Cancelled);
        }
        self.controller.cancel(session, self.clock.now())?;
        self.metric(|m| m.session_finished(SessionState::Cancelled, false));
        Ok(true)
    }

    fn on_finished(&self, session: &Session, direct: bool) {
        let state = session.state();
        self.metric(|m| m.session_finished(state, direct));
        if let Some(input) = session.complete_input() {
            events::session_completed(
                session.id(),
                session.attempt_count(),
                &input.metadata().rag_strategy_used,
            );
        }
    }

    fn degraded(
        &self,
        session_id: &str,
        attempt: u32,
        exhausted: Exhausted,
        fallback: &str,
    ) -> DegradedInfo {
        let Exhausted { error, tries } = exhausted;
        lock(&self.degradation).record(
            error.service,
            &error.reason,
            fallback,
            session_id,
            attempt,
            self.clock.now(),
        );
        DegradedInfo {
            service: error.service,
            reason: error.reason,
            tries,
        }
    }

    fn recovered(&self, service: ServiceKind) {
        let mut tracker = lock(&self.degradation);
        if tracker.is_degraded(service) {
            tracker.mark_recovered(service, self.clock.now());
        }
    }

    fn metric(&self, f: impl FnOnce(&mut OrchestrationMetrics)) {
        f(&mut lock(&self.metrics));
    }

    fn publish(&self, events: &[SessionEvent]) {
        if let Some(sink) = &self.sink {
            for event in events {
                sink.publish(event);
            }
        }
    }

    /// Publish the single event a housekeeping pass appended.
    fn publish_last(&self, session_id: &str) -> SyllabusResult<()> {
        if self.sink.is_some() {
            let last = self
                .registry
                .with_session(session_id, |s| s.events().last().cloned())?;
            if let Some(event) = last {
                self.publish(std::slice::from_ref(&event));
            }
        }
        Ok(())
    }

    fn archive_if_terminal(&self, session_id: &str, state: SessionState) -> SyllabusResult<()> {
        if state.is_terminal() {
            self.registry.archive(session_id)?;
        }
        Ok(())
    }
}

fn last_seq(session: &Session) -> u32 {
    session.events().last().map_or(0, |e| e.seq)
}

fn invalid_validation(from: SessionState, validation: &Validation) -> SyllabusError {
    let trigger = if validation.approved { "approve" } else { "reject" };
    RefinementError::InvalidTransition {
        from,
        trigger: trigger.to_string(),
    }
    .into()
}

/// Metrics and degradation state stay usable after a panic elsewhere.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
