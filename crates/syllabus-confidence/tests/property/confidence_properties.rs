use proptest::prelude::*;
use syllabus_confidence::{ConfidenceInput, ConfidenceMonitor};
use syllabus_core::models::{CurriculumDraft, RagStrategy, RetrievalFeatures};

fn arb_features() -> impl Strategy<Value = RetrievalFeatures> {
    (
        prop::collection::vec(0.0f64..=1.0, 0..8),
        prop::option::of(-1.0f64..1.0),
        0.0f64..=1.0,
        prop::collection::vec("[a-z ]{0,40}", 0..3),
    )
        .prop_map(|(similarities, margin, dispersion, retrieved_spans)| RetrievalFeatures {
            similarities,
            margin,
            dispersion,
            retrieved_spans,
            ..Default::default()
        })
}

fn arb_strategy() -> impl Strategy<Value = RagStrategy> {
    prop_oneof![
        Just(RagStrategy::Simple),
        Just(RagStrategy::Advanced),
        Just(RagStrategy::Graph),
        Just(RagStrategy::Adaptive),
    ]
}

proptest! {
    #[test]
    fn overall_is_min_and_reroute_iff_below_threshold(
        features in arb_features(),
        cp in "[A-Za-z0-9 ]{0,60}",
        atp in "[A-Za-z0-9 ]{0,60}",
        strategy in arb_strategy(),
        retrieval_degraded in any::<bool>(),
        generation_degraded in any::<bool>(),
    ) {
        let request = test_fixtures::sample_request();
        let draft = CurriculumDraft::new(cp, atp);
        let monitor = ConfidenceMonitor::default();
        let result = monitor.evaluate(&ConfidenceInput {
            request: &request,
            features: &features,
            draft: &draft,
            strategy,
            failed_strategies: &[],
            retrieval_degraded,
            generation_degraded,
        });

        prop_assert_eq!(result.c_overall, result.c_r.min(result.c_g));
        prop_assert!(result.c_overall <= result.c_r && result.c_overall <= result.c_g);
        for c in [result.c_r, result.c_g, result.c_overall] {
            prop_assert!((0.0..=1.0).contains(&c));
        }
        let below = result.c_overall < monitor.config().overall_threshold;
        prop_assert_eq!(result.needs_reroute(), below);
        prop_assert_eq!(result.degraded, retrieval_degraded || generation_degraded);
    }
}
