use std::sync::{Arc, Mutex, OnceLock, Weak};

use chrono::Duration;
use syllabus_core::config::SyllabusConfig;
use syllabus_core::errors::{
    AssemblyError, ExternalServiceError, RefinementError, ServiceKind, SessionError, SyllabusError,
};
use syllabus_core::models::{
    EscalationReason, RagStrategy, RerouteAction, RetrievalFeatures, RetrievalQuery, SessionState,
    Validation,
};
use syllabus_core::traits::IRetrievalService;
use syllabus_engine::OrchestrationEngine;
use test_fixtures::fakes::{
    good_generation_text, ManualClock, RecordingSink, ScriptedGeneration, ScriptedRetrieval,
};

struct Harness {
    engine: OrchestrationEngine,
    retrieval: Arc<ScriptedRetrieval>,
    generation: Arc<ScriptedGeneration>,
    sink: Arc<RecordingSink>,
    clock: Arc<ManualClock>,
}

fn config(auto_reroute: bool) -> SyllabusConfig {
    let mut config = SyllabusConfig::default();
    config.refinement.auto_reroute = auto_reroute;
    config.retry.initial_backoff_ms = 0;
    config.retry.max_backoff_ms = 0;
    config
}

fn harness_with(
    config: SyllabusConfig,
    retrieval: ScriptedRetrieval,
    generation: ScriptedGeneration,
) -> Harness {
    let retrieval = Arc::new(retrieval);
    let generation = Arc::new(generation);
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::fixed());
    let engine = OrchestrationEngine::new(config, retrieval.clone(), generation.clone())
        .with_event_sink(sink.clone())
        .with_clock(clock.clone());
    Harness {
        engine,
        retrieval,
        generation,
        sink,
        clock,
    }
}

fn harness(auto_reroute: bool) -> Harness {
    harness_with(
        config(auto_reroute),
        ScriptedRetrieval::constant(test_fixtures::strong_features()),
        ScriptedGeneration::constant(good_generation_text()),
    )
}

/// Features from the low-retrieval scenario: `C_r = 0.75`, `C_g >= 0.9`.
fn weak_retrieval() -> RetrievalFeatures {
    RetrievalFeatures {
        similarities: vec![0.8; 5],
        margin: Some(0.4),
        dispersion: 0.1,
        source_ids: Vec::new(),
        ..test_fixtures::strong_features()
    }
}

// ── Intake ──

#[test]
fn missing_basic_info_creates_no_session() {
    let h = harness(true);
    let mut request = test_fixtures::sample_request();
    request.basic_info.teacher_name = String::new();
    request.basic_info.topic = " ".into();

    let err = h.engine.submit_request(request).unwrap_err();
    match err {
        SyllabusError::AssemblyError(AssemblyError::IncompleteInput { missing }) => {
            assert_eq!(missing, vec!["teacher_name".to_string(), "topic".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(h.engine.stats().unwrap().total(), 0);
    assert_eq!(h.retrieval.calls(), 0);
}

#[test]
fn supplied_cp_atp_completes_directly() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::supplied_request()).unwrap();

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::Approved);
    let input = status.complete_input.unwrap();
    assert_eq!(input.metadata().orchestration_strategy, "direct");
    assert_eq!(input.metadata().rag_strategy_used, "none");
    assert_eq!(h.retrieval.calls(), 0);
    assert_eq!(h.generation.calls(), 0);
    assert_eq!(h.sink.names(), vec!["input_analysis", "complete"]);
}

// ── Generation path ──

#[test]
fn confident_attempt_waits_for_reviewer_then_completes() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    assert!(id.starts_with("rag-"));

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::AwaitingValidation);
    assert_eq!(status.current_strategy, Some(RagStrategy::Advanced));
    assert!(status.latest_confidence.unwrap().c_overall >= 0.8);

    let ack = h.engine.submit_validation(&id, Validation::approve()).unwrap();
    assert_eq!(ack.state, SessionState::Approved);

    let input = h.engine.get_status(&id).unwrap().complete_input.unwrap();
    assert!(input.is_complete());
    assert_eq!(input.metadata().orchestration_strategy, "cp_atp_generation");
    assert_eq!(input.metadata().rag_strategy_used, "advanced");
    assert_eq!(input.metadata().attempt_count, 1);
    assert_eq!(input.technical_info().status, "complete");

    let json = serde_json::to_value(&input).unwrap();
    assert!(json["metadata"]["confidence_scores"]["C_overall"].is_number());
    assert!(json["curriculum_content"]["cp"].as_str().unwrap().contains("mampu"));
}

#[test]
fn event_stream_is_ordered_and_pushed_once() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    h.engine.submit_validation(&id, Validation::approve()).unwrap();

    let events = h.engine.events(&id, 0).unwrap();
    let names: Vec<_> = events.iter().map(|e| e.kind.name()).collect();
    assert_eq!(
        names,
        vec![
            "input_analysis",
            "strategy_selected",
            "generation_complete",
            "confidence_computed",
            "validation_requested",
            "complete"
        ]
    );
    assert_eq!(h.sink.events(), events);
    assert_eq!(h.engine.events(&id, 4).unwrap().len(), 2);
}

#[test]
fn generation_request_carries_model_strategy_and_context() {
    let h = harness(true);
    h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    let requests = h.generation.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].strategy, RagStrategy::Advanced);
    assert_eq!(requests[0].context.len(), 3);
    assert!(requests[0].prompt.contains("Persamaan Linear"));
}

#[test]
fn advanced_rejected_twice_forces_graph_on_third_attempt() {
    let h = harness(false);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    h.engine
        .submit_validation(&id, Validation::reject("kurang kontekstual"))
        .unwrap();
    let second = h.engine.get_status(&id).unwrap();
    assert_eq!(second.attempt_count, 2);
    assert_eq!(second.current_strategy, Some(RagStrategy::Advanced));

    let ack = h
        .engine
        .submit_validation(&id, Validation::reject("masih terlalu umum"))
        .unwrap();
    assert_eq!(ack.state, SessionState::AwaitingValidation);

    let third = h.engine.get_status(&id).unwrap();
    assert_eq!(third.attempt_count, 3);
    assert_eq!(third.current_strategy, Some(RagStrategy::Graph));

    let queries = h.retrieval.queries();
    assert_eq!(queries[2].strategy_hint, Some(RagStrategy::Graph));
    assert_eq!(queries[2].constraints.len(), 2);
    let prompt = &h.generation.requests()[2].prompt;
    assert!(prompt.contains("masih terlalu umum"));
}

#[test]
fn third_rejection_escalates() {
    let h = harness(false);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    for feedback in ["satu", "dua"] {
        h.engine
            .submit_validation(&id, Validation::reject(feedback))
            .unwrap();
    }
    let ack = h
        .engine
        .submit_validation(&id, Validation::reject("tiga"))
        .unwrap();
    assert_eq!(ack.state, SessionState::Escalated);

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(
        status.escalation,
        Some(EscalationReason::AttemptsExhausted { attempts: 3 })
    );
    assert!(status.complete_input.is_none());
    assert_eq!(h.sink.names().last(), Some(&"escalated"));
    assert!(matches!(
        h.engine.submit_validation(&id, Validation::approve()),
        Err(SyllabusError::RefinementError(RefinementError::InvalidTransition { .. }))
    ));
}

// ── Automatic reroute ──

#[test]
fn low_retrieval_confidence_expands_search_and_refines() {
    let h = harness_with(
        config(true),
        ScriptedRetrieval::scripted(
            vec![Ok(weak_retrieval())],
            Ok(test_fixtures::strong_features()),
        ),
        ScriptedGeneration::constant(good_generation_text()),
    );
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    let events = h.engine.events(&id, 0).unwrap();
    let names: Vec<_> = events.iter().map(|e| e.kind.name()).collect();
    assert!(names.contains(&"refinement_started"));

    let first = events
        .iter()
        .find_map(|e| match &e.kind {
            syllabus_core::models::EventKind::ConfidenceComputed { confidence, .. } => {
                Some(confidence.clone())
            }
            _ => None,
        })
        .unwrap();
    assert!((first.c_r - 0.75).abs() < 1e-9);
    assert_eq!(first.c_overall, first.c_r);
    assert_eq!(first.reroute, RerouteAction::ExpandSearch);

    let queries = h.retrieval.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].top_k, 5);
    assert_eq!(queries[1].top_k, 10);

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::AwaitingValidation);
    assert_eq!(status.attempt_count, 2);
}

#[test]
fn low_confidence_waits_for_reviewer_without_auto_reroute() {
    let h = harness_with(
        config(false),
        ScriptedRetrieval::constant(weak_retrieval()),
        ScriptedGeneration::constant(good_generation_text()),
    );
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::AwaitingValidation);
    assert_eq!(
        status.latest_confidence.unwrap().reroute,
        RerouteAction::ExpandSearch
    );
    assert_eq!(h.retrieval.calls(), 1);
}

// ── Degradation ──

#[test]
fn retrieval_outage_degrades_then_escalates() {
    let h = harness_with(
        config(true),
        ScriptedRetrieval::failing(ExternalServiceError::transient(
            ServiceKind::Retrieval,
            "connection reset",
        )),
        ScriptedGeneration::constant(good_generation_text()),
    );
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::Escalated);
    assert!(matches!(
        status.escalation,
        Some(EscalationReason::StrategyExhausted { .. })
    ));
    assert!(status.latest_confidence.unwrap().degraded);
    // Three tries per attempt.
    assert_eq!(h.retrieval.calls() % 3, 0);

    let degraded_event = h
        .engine
        .events(&id, 0)
        .unwrap()
        .into_iter()
        .any(|e| matches!(e.kind, syllabus_core::models::EventKind::GenerationComplete { degraded: true, .. }));
    assert!(degraded_event);
    assert!(matches!(
        h.engine.submit_validation(&id, Validation::approve()),
        Err(SyllabusError::RefinementError(RefinementError::StrategyExhausted { .. }))
    ));
}

#[test]
fn weak_retrieval_exhausts_strategies_before_max_attempts() {
    let h = harness_with(
        config(true),
        ScriptedRetrieval::constant(RetrievalFeatures {
            similarities: vec![0.3, 0.2],
            source_ids: Vec::new(),
            entity_count: 0,
            dispersion: 0.1,
            specificity: 0.5,
            ..test_fixtures::strong_features()
        }),
        ScriptedGeneration::constant(good_generation_text()),
    );
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::Escalated);
    assert_eq!(status.current_strategy, Some(RagStrategy::Adaptive));
    // Adaptive failed twice and has no successor.
    assert_eq!(status.attempt_count, 2);
    assert_eq!(
        status.escalation,
        Some(EscalationReason::StrategyExhausted {
            attempts: status.attempt_count,
            last_strategy: RagStrategy::Adaptive
        })
    );

    let err = h
        .engine
        .submit_validation(&id, Validation::reject("coba lagi"))
        .unwrap_err();
    match err {
        SyllabusError::RefinementError(RefinementError::StrategyExhausted {
            attempts,
            last_strategy,
        }) => {
            assert_eq!(attempts, status.attempt_count);
            assert_eq!(last_strategy, RagStrategy::Adaptive);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn generation_failure_is_not_retried_when_permanent() {
    let h = harness_with(
        config(false),
        ScriptedRetrieval::constant(test_fixtures::strong_features()),
        ScriptedGeneration::failing(ExternalServiceError::permanent(
            ServiceKind::Generation,
            "invalid api key",
        )),
    );
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    assert_eq!(h.generation.calls(), 1);
    let status = h.engine.get_status(&id).unwrap();
    let confidence = status.latest_confidence.unwrap();
    assert!(confidence.degraded);
    assert!(confidence.c_overall < 0.8);

    // The empty draft cannot be assembled.
    let err = h
        .engine
        .submit_validation(&id, Validation::approve())
        .unwrap_err();
    assert!(err.to_string().contains("incomplete input"));
    assert_eq!(
        h.engine.get_status(&id).unwrap().state,
        SessionState::AwaitingValidation
    );
}

#[test]
fn invalid_features_escalate_before_selection() {
    let h = harness_with(
        config(true),
        ScriptedRetrieval::constant(RetrievalFeatures {
            similarities: vec![0.9, 1.4],
            ..test_fixtures::strong_features()
        }),
        ScriptedGeneration::constant(good_generation_text()),
    );
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::Escalated);
    match status.escalation.unwrap() {
        EscalationReason::InvalidInput { detail } => assert!(detail.contains("similarities[1]")),
        other => panic!("unexpected reason: {other:?}"),
    }
    assert_eq!(h.generation.calls(), 0);
}

// ── Timeout, cancel, caps ──

#[test]
fn idle_session_times_out_and_is_archived() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    h.clock.advance(Duration::minutes(31));

    let err = h
        .engine
        .submit_validation(&id, Validation::approve())
        .unwrap_err();
    assert!(matches!(
        err,
        SyllabusError::SessionError(SessionError::Timeout { .. })
    ));

    let status = h.engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::Expired);
    assert!(status.complete_input.is_none());
    assert_eq!(h.engine.stats().unwrap().archived, 1);
    // Log survives archiving.
    assert_eq!(h.engine.events(&id, 0).unwrap().last().unwrap().kind.name(), "escalated");
}

#[test]
fn housekeeping_expires_and_purges() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    h.clock.advance(Duration::minutes(29));
    assert!(h.engine.expire_idle().unwrap().is_empty());

    h.clock.advance(Duration::minutes(2));
    assert_eq!(h.engine.expire_idle().unwrap(), vec![id.clone()]);
    assert_eq!(h.sink.names().last(), Some(&"escalated"));

    h.clock.advance(Duration::hours(25));
    assert_eq!(h.engine.purge_archive().unwrap(), 1);
    assert!(h.engine.get_status(&id).is_err());
}

#[test]
fn cancel_is_final_and_idempotent() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();

    assert_eq!(h.engine.cancel(&id).unwrap().state, SessionState::Cancelled);
    assert_eq!(h.engine.cancel(&id).unwrap().state, SessionState::Cancelled);
    let before = h.engine.events(&id, 0).unwrap();

    for validation in [Validation::approve(), Validation::reject("terlambat")] {
        let ack = h.engine.submit_validation(&id, validation).unwrap();
        assert_eq!(ack.state, SessionState::Cancelled);
    }
    assert_eq!(h.engine.events(&id, 0).unwrap(), before);
    assert!(h.engine.get_status(&id).unwrap().complete_input.is_none());
    assert_eq!(h.generation.calls(), 1);
    assert_eq!(h.sink.names().last(), Some(&"cancelled"));
}

#[test]
fn raised_cancel_flag_wins_over_a_pending_verdict() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    h.engine.request_cancel(&id).unwrap();

    let ack = h.engine.submit_validation(&id, Validation::approve()).unwrap();
    assert_eq!(ack.state, SessionState::Cancelled);
    assert!(h.engine.get_status(&id).unwrap().complete_input.is_none());
    assert_eq!(h.sink.names().last(), Some(&"cancelled"));
}

/// Retrieval that cancels every live session while its call is in flight.
struct CancellingRetrieval {
    engine: OnceLock<Weak<OrchestrationEngine>>,
    cancelled: Mutex<Vec<String>>,
}

impl IRetrievalService for CancellingRetrieval {
    fn query(&self, _query: &RetrievalQuery) -> Result<RetrievalFeatures, ExternalServiceError> {
        if let Some(engine) = self.engine.get().and_then(Weak::upgrade) {
            for id in engine.live_sessions() {
                engine.request_cancel(&id).unwrap();
                self.cancelled.lock().unwrap().push(id);
            }
        }
        Ok(test_fixtures::strong_features())
    }
}

#[test]
fn cancel_during_retrieval_discards_the_result() {
    let retrieval = Arc::new(CancellingRetrieval {
        engine: OnceLock::new(),
        cancelled: Mutex::new(Vec::new()),
    });
    let generation = Arc::new(ScriptedGeneration::constant(good_generation_text()));
    let sink = Arc::new(RecordingSink::new());
    let engine = Arc::new(
        OrchestrationEngine::new(config(true), retrieval.clone(), generation.clone())
            .with_event_sink(sink.clone())
            .with_clock(Arc::new(ManualClock::fixed())),
    );
    retrieval.engine.set(Arc::downgrade(&engine)).ok();

    let id = engine.submit_request(test_fixtures::sample_request()).unwrap();
    assert_eq!(*retrieval.cancelled.lock().unwrap(), vec![id.clone()]);

    let status = engine.get_status(&id).unwrap();
    assert_eq!(status.state, SessionState::Cancelled);
    assert_eq!(status.attempt_count, 0);
    assert_eq!(generation.calls(), 0);
    let names: Vec<_> = engine
        .events(&id, 0)
        .unwrap()
        .iter()
        .map(|e| e.kind.name())
        .collect();
    assert_eq!(names, vec!["input_analysis", "cancelled"]);
    assert_eq!(sink.names(), names);
    assert_eq!(engine.cancel(&id).unwrap().state, SessionState::Cancelled);
}

#[test]
fn unknown_session_is_not_found() {
    let h = harness(true);
    assert!(matches!(
        h.engine.get_status("rag-000000000000"),
        Err(SyllabusError::SessionError(SessionError::NotFound { .. }))
    ));
}

#[test]
fn sixth_session_cancels_the_oldest() {
    let h = harness(true);
    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(h.engine.submit_request(test_fixtures::sample_request()).unwrap());
        h.clock.advance(Duration::seconds(1));
    }

    assert_eq!(h.engine.get_status(&ids[0]).unwrap().state, SessionState::Cancelled);
    for id in &ids[1..] {
        assert_eq!(
            h.engine.get_status(id).unwrap().state,
            SessionState::AwaitingValidation
        );
    }
    let stats = h.engine.stats().unwrap();
    assert_eq!(stats.count(SessionState::Cancelled), 1);
    assert_eq!(stats.live, 5);
}

#[test]
fn metrics_follow_sessions() {
    let h = harness(true);
    let id = h.engine.submit_request(test_fixtures::sample_request()).unwrap();
    h.engine.submit_validation(&id, Validation::approve()).unwrap();

    let snapshot = h.engine.metrics_snapshot().unwrap();
    assert_eq!(snapshot["counters"]["sessions_started"], 1);
    assert_eq!(snapshot["counters"]["outcomes"]["approved"], 1);
    assert_eq!(snapshot["counters"]["strategy_usage"]["advanced"], 1);
    assert!(h.engine.degradation_alerts().is_empty());
}
