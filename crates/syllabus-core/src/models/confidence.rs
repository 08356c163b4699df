use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::ConfidenceScores;

/// Corrective action suggested when overall confidence is below threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RerouteAction {
    ExpandSearch,
    RewriteQuery,
    Regenerate,
    SwitchStrategy,
    None,
}

impl RerouteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RerouteAction::ExpandSearch => "expand_search",
            RerouteAction::RewriteQuery => "rewrite_query",
            RerouteAction::Regenerate => "regenerate",
            RerouteAction::SwitchStrategy => "switch_strategy",
            RerouteAction::None => "none",
        }
    }

    pub fn is_none(self) -> bool {
        self == RerouteAction::None
    }
}

impl fmt::Display for RerouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which component bounds `C_overall`. Ties count as retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LimitingFactor {
    Retrieval,
    Generation,
}

/// Breakdown of `C_r`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RetrievalConfidence {
    pub similarity: f64,
    pub diversity: f64,
    pub margin: f64,
}

/// Breakdown of `C_g`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationConfidence {
    pub coverage: f64,
    pub faithfulness: f64,
    pub hallucination_risk: f64,
}

/// Heuristic content quality, reported alongside confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QualityReport {
    pub content_completeness: f64,
    pub content_coherence: f64,
    pub educational_relevance: f64,
    pub recommendations: Vec<String>,
}

impl QualityReport {
    /// Mean of the three quality metrics.
    pub fn overall(&self) -> f64 {
        (self.content_completeness + self.content_coherence + self.educational_relevance) / 3.0
    }
}

/// Output of the confidence monitor for one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConfidenceResult {
    #[serde(rename = "C_r")]
    pub c_r: f64,
    #[serde(rename = "C_g")]
    pub c_g: f64,
    #[serde(rename = "C_overall")]
    pub c_overall: f64,
    pub retrieval: RetrievalConfidence,
    pub generation: GenerationConfidence,
    pub limiting: LimitingFactor,
    pub reroute: RerouteAction,
    /// A collaborator failed and the affected component was penalized.
    pub degraded: bool,
    pub quality: QualityReport,
}

impl ConfidenceResult {
    /// Whether the monitor asked for a reroute.
    pub fn needs_reroute(&self) -> bool {
        !self.reroute.is_none()
    }

    pub fn scores(&self) -> ConfidenceScores {
        ConfidenceScores {
            c_r: self.c_r,
            c_g: self.c_g,
            c_overall: self.c_overall,
        }
    }
}
