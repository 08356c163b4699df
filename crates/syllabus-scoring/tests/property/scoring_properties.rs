use proptest::prelude::*;
use syllabus_core::config::TemplateWeights;
use syllabus_core::models::{RagStrategy, RetrievalFeatures, ScoreResult};
use syllabus_scoring::formula;
use syllabus_scoring::{ScoreEngine, StrategySelector};

fn arb_features() -> impl Strategy<Value = RetrievalFeatures> {
    (
        prop::collection::vec(0.0f64..=1.0, 0..10),
        prop::option::of(-2.0f64..2.0),
        0usize..60,
        0usize..12,
        0.0f64..=1.0,
        0usize..20,
        any::<bool>(),
        0.0f64..=1.0,
        0.0f64..=1.0,
    )
        .prop_map(
            |(
                similarities,
                margin,
                token_length,
                entity_count,
                dispersion,
                relation_mentions,
                relational_keyword,
                subgraph_density,
                specificity,
            )| RetrievalFeatures {
                similarities,
                margin,
                token_length,
                entity_count,
                dispersion,
                relation_mentions,
                relational_keyword,
                subgraph_density,
                specificity,
                ..Default::default()
            },
        )
}

fn arb_scores() -> impl Strategy<Value = ScoreResult> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, arb_features()).prop_map(
        |(s_tmpl, s_adv, s_graph, features)| ScoreResult {
            s_tmpl,
            s_adv,
            s_graph,
            features,
        },
    )
}

proptest! {
    #[test]
    fn scores_are_always_in_unit_interval(features in arb_features()) {
        let result = ScoreEngine::default().score(&features).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.s_tmpl));
        prop_assert!((0.0..=1.0).contains(&result.s_adv));
        prop_assert!((0.0..=1.0).contains(&result.s_graph));
    }

    #[test]
    fn template_score_non_decreasing_in_mean_similarity(
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
        margin in 0.0f64..=1.0,
    ) {
        let weights = TemplateWeights::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            formula::template_from_parts(lo, margin, &weights)
                <= formula::template_from_parts(hi, margin, &weights)
        );
    }

    #[test]
    fn selection_is_deterministic(scores in arb_scores()) {
        let selector = StrategySelector::default();
        prop_assert_eq!(selector.select(&scores), selector.select(&scores));
    }

    #[test]
    fn selection_respects_priority(scores in arb_scores()) {
        let config = syllabus_core::config::SelectionConfig::default();
        let decision = StrategySelector::default().select(&scores);
        let f = &scores.features;

        let simple = scores.s_tmpl >= config.simple_threshold;
        let advanced = (f.token_length > config.advanced_min_tokens
            || f.entity_count >= config.advanced_min_entities)
            && scores.s_adv >= config.advanced_threshold;
        let graph = f.relational_keyword && scores.s_graph >= config.graph_threshold;

        let expected = if simple {
            RagStrategy::Simple
        } else if advanced {
            RagStrategy::Advanced
        } else if graph {
            RagStrategy::Graph
        } else {
            RagStrategy::Adaptive
        };
        prop_assert_eq!(decision.strategy, expected);
    }
}
