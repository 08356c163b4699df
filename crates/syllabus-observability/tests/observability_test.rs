use chrono::{Duration, TimeZone, Utc};
use syllabus_core::errors::ServiceKind;
use syllabus_core::models::{RagStrategy, RerouteAction, SessionState};
use syllabus_observability::degradation::RecoveryStatus;
use syllabus_observability::tracing_setup::spans::names;
use syllabus_observability::{evaluate_alerts, AlertLevel, DegradationTracker, OrchestrationMetrics};

// ── Degradation tracker ──

#[test]
fn recovery_clears_active_degradations() {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let mut tracker = DegradationTracker::new();
    tracker.record(ServiceKind::Retrieval, "timeout", "query profile", "rag-1", 1, t0);
    tracker.record(ServiceKind::Generation, "503", "empty draft", "rag-1", 1, t0);
    assert!(tracker.is_degraded(ServiceKind::Retrieval));

    tracker.mark_recovered(ServiceKind::Retrieval, t0 + Duration::seconds(30));
    assert!(!tracker.is_degraded(ServiceKind::Retrieval));
    assert_eq!(tracker.active().len(), 1);
    assert_eq!(tracker.records()[0].recovery_status, RecoveryStatus::Recovered);
}

#[test]
fn frequent_degradation_warns() {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let mut tracker = DegradationTracker::new();
    for i in 0..4 {
        tracker.record(ServiceKind::Retrieval, "timeout", "query profile", "rag-1", i, t0 + Duration::minutes(i as i64));
        tracker.mark_recovered(ServiceKind::Retrieval, t0 + Duration::minutes(i as i64));
    }
    let alerts = evaluate_alerts(&tracker, t0 + Duration::minutes(10));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
}

#[test]
fn long_degradation_is_critical() {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let mut tracker = DegradationTracker::new();
    tracker.record(ServiceKind::Generation, "503", "empty draft", "rag-1", 1, t0);
    let alerts = evaluate_alerts(&tracker, t0 + Duration::hours(2));
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert!(evaluate_alerts(&tracker, t0 + Duration::minutes(5)).is_empty());
}

// ── Metrics ──

#[test]
fn metrics_track_attempts_and_outcomes() {
    let mut metrics = OrchestrationMetrics::new();
    metrics.session_started();
    metrics.attempt_generated(RagStrategy::Advanced, false, false, 400);
    metrics.confidence_recorded(0.75, RerouteAction::ExpandSearch);
    metrics.attempt_generated(RagStrategy::Graph, true, true, 300);
    metrics.confidence_recorded(0.85, RerouteAction::None);
    metrics.session_finished(SessionState::Approved, false);

    assert_eq!(metrics.attempts, 2);
    assert_eq!(metrics.forced_selections, 1);
    assert_eq!(metrics.degraded_attempts, 1);
    assert_eq!(metrics.total_tokens, 700);
    assert_eq!(metrics.reroutes.get("expand_search"), Some(&1));
    assert_eq!(metrics.outcome_count(SessionState::Approved), 1);
    assert!((metrics.avg_confidence() - 0.8).abs() < 1e-9);
    assert!((metrics.avg_attempts() - 2.0).abs() < 1e-9);

    let snapshot = metrics.snapshot().unwrap();
    assert_eq!(snapshot["counters"]["strategy_usage"]["graph"], 1);
}

#[test]
fn span_names_share_a_prefix() {
    for name in [names::SESSION, names::ATTEMPT, names::SCORING, names::CONFIDENCE] {
        assert!(name.starts_with("syllabus."));
    }
}
