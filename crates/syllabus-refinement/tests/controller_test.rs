mod common;

use common::*;
use syllabus_core::errors::{ScoringError, SyllabusError};
use syllabus_core::models::{
    DecisionSource, EscalationReason, ForceReason, RagStrategy, RerouteAction, SessionState,
    UserDecision,
};
use syllabus_refinement::{NextStep, RefinementController};

// ── Happy path ──

#[test]
fn approve_produces_complete_input() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);

    let step = run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));
    assert_eq!(step, NextStep::AwaitValidation);
    assert_eq!(session.state(), SessionState::AwaitingValidation);

    let input = ctrl.approve(&mut session, at(2)).unwrap();
    assert_eq!(session.state(), SessionState::Approved);
    assert!(input.is_complete());
    assert_eq!(input.metadata().orchestration_strategy, "cp_atp_generation");
    assert_eq!(input.metadata().rag_strategy_used, "advanced");
    assert_eq!(input.metadata().attempt_count, 1);
    assert_eq!(input.metadata().confidence_history.len(), 1);
    assert_eq!(session.complete_input(), Some(&input));
}

#[test]
fn every_transition_writes_one_record() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Simple, high(), at(1));
    ctrl.approve(&mut session, at(2)).unwrap();

    let states: Vec<_> = session.log().records().iter().map(|r| r.to_state).collect();
    assert_eq!(
        states,
        vec![
            SessionState::Generated,
            SessionState::AwaitingValidation,
            SessionState::Approved
        ]
    );
    let generated = &session.log().records()[0];
    assert!(generated.content_hash.is_some());
    assert_eq!(generated.strategy, Some(RagStrategy::Simple));
}

#[test]
fn events_are_ordered_and_end_with_complete() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));
    ctrl.approve(&mut session, at(2)).unwrap();

    let names: Vec<_> = session.events().iter().map(|e| e.kind.name()).collect();
    assert_eq!(
        names,
        vec![
            "generation_complete",
            "confidence_computed",
            "validation_requested",
            "complete"
        ]
    );
    let seqs: Vec<_> = session.events().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert_eq!(session.events_since(2).len(), 2);
}

#[test]
fn approve_with_unusable_draft_keeps_session_awaiting() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    ctrl.plan_attempt(&mut session).unwrap();
    let mut attempt = outcome(RagStrategy::Advanced);
    attempt.draft = Default::default();
    ctrl.record_generation(&mut session, attempt, at(1)).unwrap();
    ctrl.record_confidence(&mut session, high(), at(1)).unwrap();

    let err = ctrl.approve(&mut session, at(2)).unwrap_err();
    assert!(err.to_string().contains("incomplete input"));
    assert_eq!(session.state(), SessionState::AwaitingValidation);
}

// ── Rejection and forced downgrade ──

#[test]
fn advanced_rejected_twice_forces_graph() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);

    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));
    let step = ctrl
        .reject(&mut session, Some("terlalu umum".into()), at(2))
        .unwrap();
    assert_eq!(step, NextStep::Continue);
    assert_eq!(session.forced_strategy(), None);

    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(3));
    ctrl.reject(&mut session, Some("masih kurang".into()), at(4))
        .unwrap();
    assert_eq!(session.state(), SessionState::Refining);
    assert_eq!(
        session.forced_strategy(),
        Some((RagStrategy::Graph, ForceReason::RepeatedRejection))
    );

    let plan = ctrl.plan_attempt(&mut session).unwrap();
    assert_eq!(plan.attempt, 3);
    assert_eq!(plan.query.strategy_hint, Some(RagStrategy::Graph));
    assert_eq!(
        plan.query.constraints,
        vec!["terlalu umum".to_string(), "masih kurang".to_string()]
    );
}

#[test]
fn rejection_record_keeps_reviewer_feedback() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Simple, high(), at(1));
    ctrl.reject(&mut session, Some("  tambah contoh  ".into()), at(2))
        .unwrap();

    let rejected = session
        .log()
        .records()
        .iter()
        .find(|r| r.user_decision == UserDecision::Rejected)
        .unwrap();
    assert_eq!(rejected.feedback.as_deref(), Some("tambah contoh"));
    assert_eq!(rejected.decided_by, Some(DecisionSource::Reviewer));
    assert_eq!(rejected.strategy, Some(RagStrategy::Simple));
}

#[test]
fn attempts_exhausted_escalates_with_reason() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    let strategies = [RagStrategy::Simple, RagStrategy::Advanced, RagStrategy::Graph];
    let mut last = NextStep::AwaitValidation;
    for (i, strategy) in strategies.into_iter().enumerate() {
        let t = (i as i64) * 10;
        run_attempt(&ctrl, &mut session, strategy, high(), at(t));
        last = ctrl.reject(&mut session, None, at(t + 5)).unwrap();
    }
    assert_eq!(
        last,
        NextStep::Escalated(EscalationReason::AttemptsExhausted { attempts: 3 })
    );
    assert_eq!(session.state(), SessionState::Escalated);
    assert!(session.escalation().is_some());
    let event = session.events().last().unwrap();
    assert_eq!(event.kind.name(), "escalated");
}

#[test]
fn adaptive_rejected_twice_has_nowhere_to_go() {
    let ctrl = RefinementController::new(
        syllabus_core::config::RefinementConfig {
            max_attempts: 5,
            auto_reroute: false,
            ..Default::default()
        },
        Default::default(),
    );
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Adaptive, high(), at(1));
    ctrl.reject(&mut session, None, at(2)).unwrap();
    run_attempt(&ctrl, &mut session, RagStrategy::Adaptive, high(), at(3));
    let step = ctrl.reject(&mut session, None, at(4)).unwrap();
    assert_eq!(
        step,
        NextStep::Escalated(EscalationReason::NoStrategyRemaining {
            last_strategy: RagStrategy::Adaptive
        })
    );
}

// ── Automatic reroute ──

#[test]
fn low_confidence_is_rejected_by_the_monitor() {
    let ctrl = controller(true);
    let mut session = open(&ctrl);
    let step = run_attempt(
        &ctrl,
        &mut session,
        RagStrategy::Advanced,
        confidence(0.75, RerouteAction::ExpandSearch),
        at(1),
    );
    assert_eq!(step, NextStep::Continue);
    assert_eq!(session.state(), SessionState::Refining);

    let rejected = session
        .log()
        .records()
        .iter()
        .find(|r| r.user_decision == UserDecision::Rejected)
        .unwrap();
    assert_eq!(rejected.decided_by, Some(DecisionSource::Monitor));
    // Monitor notes do not become query constraints.
    assert!(session.constraints().is_empty());

    let plan = ctrl.plan_attempt(&mut session).unwrap();
    assert_eq!(plan.reroute, RerouteAction::ExpandSearch);
    assert_eq!(plan.query.top_k, 10);
    assert_eq!(session.top_k(), 10);
}

#[test]
fn expanded_top_k_is_capped() {
    let ctrl = RefinementController::new(
        syllabus_core::config::RefinementConfig {
            max_attempts: 10,
            ..Default::default()
        },
        Default::default(),
    );
    let mut session = open(&ctrl);
    for i in 0..4 {
        run_attempt(
            &ctrl,
            &mut session,
            RagStrategy::Advanced,
            confidence(0.5, RerouteAction::ExpandSearch),
            at(i),
        );
    }
    let plan = ctrl.plan_attempt(&mut session).unwrap();
    assert_eq!(plan.query.top_k, 20);
}

#[test]
fn switch_strategy_forces_the_next_strategy() {
    let ctrl = controller(true);
    let mut session = open(&ctrl);
    run_attempt(
        &ctrl,
        &mut session,
        RagStrategy::Simple,
        confidence(0.6, RerouteAction::SwitchStrategy),
        at(1),
    );
    assert_eq!(
        session.forced_strategy(),
        Some((RagStrategy::Advanced, ForceReason::Reroute))
    );
}

#[test]
fn rewrite_query_marks_the_query() {
    let ctrl = controller(true);
    let mut session = open(&ctrl);
    let original = session.query_text().to_string();
    run_attempt(
        &ctrl,
        &mut session,
        RagStrategy::Advanced,
        confidence(0.6, RerouteAction::RewriteQuery),
        at(1),
    );
    let plan = ctrl.plan_attempt(&mut session).unwrap();
    assert!(plan.query.rewritten);
    assert_ne!(plan.query.text, original);
    assert!(plan.query.text.contains("Persamaan Linear"));
}

#[test]
fn regenerate_reuses_previous_features() {
    let ctrl = controller(true);
    let mut session = open(&ctrl);
    run_attempt(
        &ctrl,
        &mut session,
        RagStrategy::Advanced,
        confidence(0.6, RerouteAction::Regenerate),
        at(1),
    );
    let plan = ctrl.plan_attempt(&mut session).unwrap();
    assert_eq!(plan.reuse_features, Some(test_fixtures::features_with(0.7, 0.1)));
}

#[test]
fn repeated_low_confidence_escalates_as_strategy_exhausted() {
    let ctrl = controller(true);
    let mut session = open(&ctrl);
    let mut last = NextStep::AwaitValidation;
    for i in 0..3 {
        last = run_attempt(
            &ctrl,
            &mut session,
            RagStrategy::Advanced,
            confidence(0.5, RerouteAction::RewriteQuery),
            at(i),
        );
    }
    assert!(matches!(
        last,
        NextStep::Escalated(EscalationReason::StrategyExhausted { attempts: 3, .. })
    ));
    assert_eq!(session.log().confidence_history().len(), 3);
}

// ── Other exits ──

#[test]
fn supplied_content_completes_without_generation() {
    let ctrl = controller(true);
    let mut session = ctrl.open("sess-2", test_fixtures::supplied_request(), t0());
    let input = ctrl.complete_supplied(&mut session, at(1)).unwrap();

    assert_eq!(session.state(), SessionState::Approved);
    assert_eq!(input.metadata().orchestration_strategy, "direct");
    assert_eq!(input.metadata().rag_strategy_used, "none");
    assert_eq!(input.metadata().confidence_scores.c_overall, 1.0);
    assert_eq!(session.attempt_count(), 0);
}

#[test]
fn expire_records_idle_time() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Simple, high(), at(0));
    ctrl.expire(&mut session, at(1900)).unwrap();

    assert_eq!(session.state(), SessionState::Expired);
    assert_eq!(
        session.escalation(),
        Some(&EscalationReason::ValidationTimeout { idle_secs: 1900 })
    );
}

#[test]
fn cancel_stops_a_live_session_only() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    ctrl.cancel(&mut session, at(1)).unwrap();
    assert_eq!(session.state(), SessionState::Cancelled);
    assert_eq!(session.events().last().unwrap().kind.name(), "cancelled");
    assert!(ctrl.cancel(&mut session, at(2)).is_err());
}

#[test]
fn invalid_features_escalate_from_initial() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    let error = SyllabusError::from(ScoringError::InvalidScoreInput {
        field: "similarities[0]".into(),
        reason: "not in [0, 1]".into(),
    })
    .in_attempt("sess-1", 1, "scoring");
    let reason = ctrl
        .escalate_invalid_input(&mut session, &error, at(1))
        .unwrap();

    assert_eq!(session.state(), SessionState::Escalated);
    assert!(reason.message().contains("similarities[0]"));
    assert!(reason.message().contains("requires manual review"));
}

#[test]
fn plan_attempt_refuses_while_awaiting_validation() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Simple, high(), at(1));
    assert!(ctrl.plan_attempt(&mut session).is_err());
}
