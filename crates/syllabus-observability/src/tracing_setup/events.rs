//! Structured log events for key orchestration steps.
//!
//! Each function emits a `tracing` event with structured fields.

use syllabus_core::models::{ConfidenceResult, EscalationReason, RerouteAction, StrategyDecision};

/// Log a request accepted into a new session.
pub fn session_started(session_id: &str, orchestration: &str, complexity: &str) {
    tracing::info!(
        event = "session_started",
        session_id = %session_id,
        orchestration = %orchestration,
        complexity = %complexity,
        "session started"
    );
}

/// Log the strategy chosen for an attempt, with its rule trace.
pub fn strategy_selected(session_id: &str, attempt: u32, decision: &StrategyDecision) {
    tracing::info!(
        event = "strategy_selected",
        session_id = %session_id,
        attempt = attempt,
        strategy = %decision.strategy,
        forced = decision.is_forced(),
        trace = %decision.trace(),
        "strategy selected"
    );
}

/// Log a confidence evaluation.
pub fn confidence_computed(session_id: &str, attempt: u32, confidence: &ConfidenceResult) {
    tracing::info!(
        event = "confidence_computed",
        session_id = %session_id,
        attempt = attempt,
        c_r = confidence.c_r,
        c_g = confidence.c_g,
        c_overall = confidence.c_overall,
        reroute = %confidence.reroute,
        degraded = confidence.degraded,
        "confidence computed"
    );
}

/// Log the start of a refinement attempt.
pub fn refinement_started(session_id: &str, attempt: u32, reroute: RerouteAction) {
    tracing::info!(
        event = "refinement_started",
        session_id = %session_id,
        attempt = attempt,
        reroute = %reroute,
        "refinement started"
    );
}

/// Log a session handed to manual review.
pub fn session_escalated(session_id: &str, reason: &EscalationReason) {
    tracing::warn!(
        event = "session_escalated",
        session_id = %session_id,
        reason = reason.name(),
        message = %reason.message(),
        "session escalated"
    );
}

/// Log a Complete Input handed to the next stage.
pub fn session_completed(session_id: &str, attempts: u32, strategy: &str) {
    tracing::info!(
        event = "session_completed",
        session_id = %session_id,
        attempts = attempts,
        strategy = %strategy,
        "session completed"
    );
}

/// Log a collaborator call that will be retried.
pub fn collaborator_retry(service: &str, attempt: u32, backoff_ms: u64, reason: &str) {
    tracing::debug!(
        event = "collaborator_retry",
        service = %service,
        attempt = attempt,
        backoff_ms = backoff_ms,
        reason = %reason,
        "retrying collaborator call"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(service: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        service = %service,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}
