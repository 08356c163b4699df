mod common;

use common::*;
use syllabus_core::config::RefinementConfig;
use syllabus_core::models::{EscalationReason, ForceReason, RagStrategy, RerouteAction};
use syllabus_refinement::policy::{plan, repeatedly_rejected, RefinementPlan};

// ── Attempt log queries ──

#[test]
fn log_counts_generated_attempts_only() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Simple, high(), at(1));
    ctrl.reject(&mut session, None, at(2)).unwrap();

    let log = session.log();
    assert_eq!(log.len(), 4);
    assert_eq!(log.attempt_count(), 1);
    assert_eq!(log.strategy_for(1), Some(RagStrategy::Simple));
    assert_eq!(log.rejected_strategies(), vec![RagStrategy::Simple]);
    assert_eq!(log.approved_attempt(), None);
    assert!(!log.all_failed_confidence());
}

// ── Follow-up planning ──

#[test]
fn single_rejection_continues_unforced() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));
    ctrl.reject(&mut session, None, at(2)).unwrap();

    assert!(!repeatedly_rejected(session.log(), 2));
    assert_eq!(
        plan(session.log(), RerouteAction::None, &RefinementConfig::default()),
        RefinementPlan::Continue {
            forced: None,
            reroute: RerouteAction::None
        }
    );
}

#[test]
fn switch_request_overrides_rejection_count() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Graph, high(), at(1));
    ctrl.reject(&mut session, None, at(2)).unwrap();

    assert_eq!(
        plan(
            session.log(),
            RerouteAction::SwitchStrategy,
            &RefinementConfig::default()
        ),
        RefinementPlan::Continue {
            forced: Some((RagStrategy::Adaptive, ForceReason::Reroute)),
            reroute: RerouteAction::SwitchStrategy
        }
    );
}

#[test]
fn zero_limit_never_forces() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Simple, high(), at(1));
    ctrl.reject(&mut session, None, at(2)).unwrap();
    assert!(!repeatedly_rejected(session.log(), 0));
}

#[test]
fn low_confidence_past_adaptive_exhausts_strategies() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(
        &ctrl,
        &mut session,
        RagStrategy::Adaptive,
        confidence(0.4, RerouteAction::SwitchStrategy),
        at(1),
    );
    ctrl.reject(&mut session, None, at(2)).unwrap();

    assert!(session.log().all_failed_confidence());
    assert_eq!(
        plan(
            session.log(),
            RerouteAction::SwitchStrategy,
            &RefinementConfig::default()
        ),
        RefinementPlan::Escalate(EscalationReason::StrategyExhausted {
            attempts: 1,
            last_strategy: RagStrategy::Adaptive
        })
    );
}
