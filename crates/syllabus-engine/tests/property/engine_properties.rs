//! Property tests over arbitrary reviewer verdict sequences.

use std::sync::Arc;

use proptest::prelude::*;
use syllabus_core::config::SyllabusConfig;
use syllabus_core::models::{SessionState, Validation};
use syllabus_engine::OrchestrationEngine;
use test_fixtures::fakes::{good_generation_text, ScriptedGeneration, ScriptedRetrieval};

fn engine() -> OrchestrationEngine {
    let mut config = SyllabusConfig::default();
    config.retry.initial_backoff_ms = 0;
    config.retry.max_backoff_ms = 0;
    OrchestrationEngine::new(
        config,
        Arc::new(ScriptedRetrieval::constant(test_fixtures::strong_features())),
        Arc::new(ScriptedGeneration::constant(good_generation_text())),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn verdicts_never_break_the_event_stream(verdicts in prop::collection::vec(any::<bool>(), 0..6)) {
        let engine = engine();
        let id = engine.submit_request(test_fixtures::sample_request()).unwrap();

        for approved in verdicts {
            let validation = if approved {
                Validation::approve()
            } else {
                Validation::reject("perbaiki")
            };
            let _ = engine.submit_validation(&id, validation);
        }

        let status = engine.get_status(&id).unwrap();
        prop_assert!(status.attempt_count <= engine.config().refinement.max_attempts);
        prop_assert_eq!(
            status.complete_input.is_some(),
            status.state == SessionState::Approved
        );

        let events = engine.events(&id, 0).unwrap();
        for (i, event) in events.iter().enumerate() {
            prop_assert_eq!(event.seq as usize, i + 1);
        }
        let finals = events.iter().filter(|e| e.kind.is_final()).count();
        prop_assert!(finals <= 1);
        if finals == 1 {
            prop_assert!(events.last().unwrap().kind.is_final());
            prop_assert!(status.state.is_terminal());
        }
    }
}
