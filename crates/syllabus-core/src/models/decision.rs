use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{RagStrategy, ScoreResult};

/// Why the refinement policy overrode the rule chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ForceReason {
    /// The same strategy was rejected on consecutive attempts.
    RepeatedRejection,
    /// The confidence monitor asked for a strategy switch.
    Reroute,
}

/// The selection rule that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DecisionRule {
    TemplateMatch,
    ComplexQuery,
    RelationalPattern,
    AdaptiveFallback,
    Forced { reason: ForceReason },
}

impl DecisionRule {
    /// 1-based position in the rule chain; 0 for a policy override.
    pub fn index(&self) -> u8 {
        match self {
            DecisionRule::TemplateMatch => 1,
            DecisionRule::ComplexQuery => 2,
            DecisionRule::RelationalPattern => 3,
            DecisionRule::AdaptiveFallback => 4,
            DecisionRule::Forced { .. } => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DecisionRule::TemplateMatch => "template_match",
            DecisionRule::ComplexQuery => "complex_query",
            DecisionRule::RelationalPattern => "relational_pattern",
            DecisionRule::AdaptiveFallback => "adaptive_fallback",
            DecisionRule::Forced { .. } => "forced",
        }
    }
}

/// Exactly one strategy chosen for an attempt, with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StrategyDecision {
    pub strategy: RagStrategy,
    /// Score evaluated by the rule that fired.
    pub score: f64,
    pub rule: DecisionRule,
    pub rationale: String,
    pub scores: ScoreResult,
    /// Strategies worth trying if this one fails.
    pub fallbacks: Vec<RagStrategy>,
}

impl StrategyDecision {
    /// Whether the refinement policy overrode the rule chain.
    pub fn is_forced(&self) -> bool {
        matches!(self.rule, DecisionRule::Forced { .. })
    }

    /// One-line rule/score trace for logs and error context.
    pub fn trace(&self) -> String {
        format!(
            "rule {} ({}) -> {} | S_tmpl={:.3} S_adv={:.3} S_graph={:.3}",
            self.rule.index(),
            self.rule.name(),
            self.strategy,
            self.scores.s_tmpl,
            self.scores.s_adv,
            self.scores.s_graph
        )
    }
}
