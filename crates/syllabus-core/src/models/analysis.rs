use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::OrchestrationStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Medium,
    Complex,
}

impl ComplexityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityLevel::Simple => "simple",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::Complex => "complex",
        }
    }
}

/// Per-factor contributions to the complexity score, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComplexityFactors {
    pub topic: f64,
    pub subject: f64,
    pub grade: f64,
    pub time: f64,
}

/// Up-front analysis of a request, emitted as the first session event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskAnalysis {
    pub complexity_level: ComplexityLevel,
    pub complexity_score: f64,
    pub factors: ComplexityFactors,
    pub missing_components: Vec<String>,
    pub orchestration: OrchestrationStrategy,
    pub estimated_processing_secs: u32,
}
