//! Property tests for the refinement loop.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use proptest::prelude::*;
use syllabus_core::models::{RagStrategy, RerouteAction, SessionState};
use syllabus_refinement::NextStep;

fn reroute_strategy() -> impl Strategy<Value = RerouteAction> {
    prop_oneof![
        Just(RerouteAction::None),
        Just(RerouteAction::ExpandSearch),
        Just(RerouteAction::RewriteQuery),
        Just(RerouteAction::Regenerate),
        Just(RerouteAction::SwitchStrategy),
    ]
}

fn rag_strategy() -> impl Strategy<Value = RagStrategy> {
    prop_oneof![
        Just(RagStrategy::Simple),
        Just(RagStrategy::Advanced),
        Just(RagStrategy::Graph),
        Just(RagStrategy::Adaptive),
    ]
}

proptest! {
    /// Rejecting every attempt ends in a terminal state within the attempt bound.
    #[test]
    fn rejection_loop_terminates(
        steps in prop::collection::vec((rag_strategy(), 0.0f64..1.0, reroute_strategy()), 1..10),
        auto in any::<bool>(),
    ) {
        let ctrl = controller(auto);
        let mut session = open(&ctrl);
        let max = ctrl.config().max_attempts;
        let mut validations = 0u32;

        for (i, (strategy, c, reroute)) in steps.into_iter().cycle().take(20).enumerate() {
            if session.is_terminal() {
                break;
            }
            let result = if reroute.is_none() { high() } else { confidence(c * 0.79, reroute) };
            let now = at(i as i64);
            let step = run_attempt(&ctrl, &mut session, strategy, result, now);
            validations += 1;
            if step == NextStep::AwaitValidation {
                ctrl.reject(&mut session, None, now).unwrap();
            }
        }

        prop_assert!(session.is_terminal());
        prop_assert_eq!(session.state(), SessionState::Escalated);
        prop_assert!(validations <= max);
        prop_assert!(session.attempt_count() <= max);
    }

    /// The log only grows and event sequence numbers stay contiguous.
    #[test]
    fn log_and_events_are_append_only(
        steps in prop::collection::vec((rag_strategy(), reroute_strategy()), 1..4),
    ) {
        let ctrl = controller(true);
        let mut session = open(&ctrl);
        let mut seen = 0usize;

        for (i, (strategy, reroute)) in steps.into_iter().enumerate() {
            if session.is_terminal() {
                break;
            }
            let result = if reroute.is_none() { high() } else { confidence(0.5, reroute) };
            let step = run_attempt(&ctrl, &mut session, strategy, result, at(i as i64));
            prop_assert!(session.log().len() > seen);
            seen = session.log().len();
            if step == NextStep::AwaitValidation {
                break;
            }
        }

        for (i, event) in session.events().iter().enumerate() {
            prop_assert_eq!(event.seq, i as u32 + 1);
        }
    }
}
