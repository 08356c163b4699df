use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Retrieval strategy executed for one attempt.
///
/// Declaration order is the priority order used when the refinement policy
/// forces a change of strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RagStrategy {
    Simple,
    Advanced,
    Graph,
    Adaptive,
}

impl RagStrategy {
    /// All strategies, highest priority first.
    pub const PRIORITY: [RagStrategy; 4] = [
        RagStrategy::Simple,
        RagStrategy::Advanced,
        RagStrategy::Graph,
        RagStrategy::Adaptive,
    ];

    /// The next strategy in priority order, or `None` after adaptive.
    pub fn next(self) -> Option<RagStrategy> {
        match self {
            RagStrategy::Simple => Some(RagStrategy::Advanced),
            RagStrategy::Advanced => Some(RagStrategy::Graph),
            RagStrategy::Graph => Some(RagStrategy::Adaptive),
            RagStrategy::Adaptive => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RagStrategy::Simple => "simple",
            RagStrategy::Advanced => "advanced",
            RagStrategy::Graph => "graph",
            RagStrategy::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for RagStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request is turned into a Complete Input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationStrategy {
    /// CP and ATP were supplied; nothing to generate.
    Direct,
    /// At least one of CP/ATP must be generated and validated.
    CpAtpGeneration,
}

impl OrchestrationStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrchestrationStrategy::Direct => "direct",
            OrchestrationStrategy::CpAtpGeneration => "cp_atp_generation",
        }
    }
}

impl fmt::Display for OrchestrationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
