//! First-match strategy selection.
//!
//! Rules are evaluated in order; the first whose predicate holds decides.
//!
//! 1. `S_tmpl ≥ simple_threshold` → simple
//! 2. `(tokens > min_tokens ∨ entities ≥ min_entities) ∧ S_adv ≥ advanced_threshold` → advanced
//! 3. `relational keyword ∧ S_graph ≥ graph_threshold` → graph
//! 4. always → adaptive

use syllabus_core::config::SelectionConfig;
use syllabus_core::models::{
    DecisionRule, ForceReason, RagStrategy, ScoreResult, StrategyDecision,
};

type Predicate = fn(&ScoreResult, &SelectionConfig) -> bool;

/// One entry of the rule chain.
#[derive(Clone)]
pub struct SelectionRule {
    pub rule: DecisionRule,
    pub strategy: RagStrategy,
    predicate: Predicate,
    /// Score the rule compares against its threshold.
    evaluated: fn(&ScoreResult) -> f64,
}

impl SelectionRule {
    pub fn index(&self) -> u8 {
        self.rule.index()
    }

    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    pub fn matches(&self, scores: &ScoreResult, config: &SelectionConfig) -> bool {
        (self.predicate)(scores, config)
    }
}

impl std::fmt::Debug for SelectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionRule")
            .field("index", &self.index())
            .field("name", &self.name())
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Pure, deterministic strategy selector.
#[derive(Debug, Clone)]
pub struct StrategySelector {
    config: SelectionConfig,
    rules: Vec<SelectionRule>,
}

impl StrategySelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    pub fn rules(&self) -> &[SelectionRule] {
        &self.rules
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Run the rule chain. Exactly one strategy is returned.
    pub fn select(&self, scores: &ScoreResult) -> StrategyDecision {
        let fired = self
            .rules
            .iter()
            .find(|rule| rule.matches(scores, &self.config));

        let (rule, strategy, score) = match fired {
            Some(r) => (r.rule, r.strategy, (r.evaluated)(scores)),
            // Rule 4 always matches; kept for a total function.
            None => (DecisionRule::AdaptiveFallback, RagStrategy::Adaptive, scores.max_score()),
        };

        let decision = StrategyDecision {
            strategy,
            score,
            rule,
            rationale: self.rationale(rule, scores),
            scores: scores.clone(),
            fallbacks: self.fallbacks(strategy, scores),
        };
        tracing::debug!(
            rule = rule.index(),
            strategy = %strategy,
            score = score,
            "strategy selected"
        );
        decision
    }

    /// Override the chain with a policy-chosen strategy, keeping the audit trail.
    pub fn force(
        &self,
        strategy: RagStrategy,
        reason: ForceReason,
        scores: &ScoreResult,
    ) -> StrategyDecision {
        let rule = DecisionRule::Forced { reason };
        StrategyDecision {
            strategy,
            score: score_for(strategy, scores),
            rule,
            rationale: match reason {
                ForceReason::RepeatedRejection => {
                    format!("previous strategy rejected repeatedly; forced to {strategy}")
                }
                ForceReason::Reroute => {
                    format!("confidence monitor requested a strategy switch; forced to {strategy}")
                }
            },
            scores: scores.clone(),
            fallbacks: self.fallbacks(strategy, scores),
        }
    }

    fn rationale(&self, rule: DecisionRule, scores: &ScoreResult) -> String {
        let c = &self.config;
        let f = &scores.features;
        match rule {
            DecisionRule::TemplateMatch => format!(
                "S_tmpl {:.3} >= {:.2}: a close template exists",
                scores.s_tmpl, c.simple_threshold
            ),
            DecisionRule::ComplexQuery => format!(
                "query has {} tokens and {} entities; S_adv {:.3} >= {:.2}",
                f.token_length, f.entity_count, scores.s_adv, c.advanced_threshold
            ),
            DecisionRule::RelationalPattern => format!(
                "relational keyword detected; S_graph {:.3} >= {:.2}",
                scores.s_graph, c.graph_threshold
            ),
            DecisionRule::AdaptiveFallback => format!(
                "no rule matched (S_tmpl {:.3}, S_adv {:.3}, S_graph {:.3})",
                scores.s_tmpl, scores.s_adv, scores.s_graph
            ),
            DecisionRule::Forced { .. } => String::new(),
        }
    }

    /// Adaptive unless chosen, plus simple when templates are still plausible.
    fn fallbacks(&self, chosen: RagStrategy, scores: &ScoreResult) -> Vec<RagStrategy> {
        let mut fallbacks = Vec::new();
        if chosen != RagStrategy::Simple && scores.s_tmpl > self.config.simple_fallback_score {
            fallbacks.push(RagStrategy::Simple);
        }
        if chosen != RagStrategy::Adaptive {
            fallbacks.push(RagStrategy::Adaptive);
        }
        fallbacks
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

fn score_for(strategy: RagStrategy, scores: &ScoreResult) -> f64 {
    match strategy {
        RagStrategy::Simple => scores.s_tmpl,
        RagStrategy::Advanced => scores.s_adv,
        RagStrategy::Graph => scores.s_graph,
        RagStrategy::Adaptive => scores.max_score(),
    }
}

fn default_rules() -> Vec<SelectionRule> {
    vec![
        SelectionRule {
            rule: DecisionRule::TemplateMatch,
            strategy: RagStrategy::Simple,
            predicate: |s, c| s.s_tmpl >= c.simple_threshold,
            evaluated: |s| s.s_tmpl,
        },
        SelectionRule {
            rule: DecisionRule::ComplexQuery,
            strategy: RagStrategy::Advanced,
            predicate: |s, c| {
                let f = &s.features;
                (f.token_length > c.advanced_min_tokens
                    || f.entity_count >= c.advanced_min_entities)
                    && s.s_adv >= c.advanced_threshold
            },
            evaluated: |s| s.s_adv,
        },
        SelectionRule {
            rule: DecisionRule::RelationalPattern,
            strategy: RagStrategy::Graph,
            predicate: |s, c| s.features.relational_keyword && s.s_graph >= c.graph_threshold,
            evaluated: |s| s.s_graph,
        },
        SelectionRule {
            rule: DecisionRule::AdaptiveFallback,
            strategy: RagStrategy::Adaptive,
            predicate: |_, _| true,
            evaluated: ScoreResult::max_score,
        },
    ]
}
