use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights aggregating the retrieval confidence `C_r`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalWeights {
    pub similarity: f64,
    pub diversity: f64,
    pub margin: f64,
}

impl Default for RetrievalWeights {
    fn default() -> Self {
        Self {
            similarity: defaults::DEFAULT_RETRIEVAL_SIMILARITY_WEIGHT,
            diversity: defaults::DEFAULT_RETRIEVAL_DIVERSITY_WEIGHT,
            margin: defaults::DEFAULT_RETRIEVAL_MARGIN_WEIGHT,
        }
    }
}

/// Weights aggregating the generation confidence `C_g`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationWeights {
    pub coverage: f64,
    pub faithfulness: f64,
    pub hallucination: f64,
}

impl Default for GenerationWeights {
    fn default() -> Self {
        Self {
            coverage: defaults::DEFAULT_GENERATION_COVERAGE_WEIGHT,
            faithfulness: defaults::DEFAULT_GENERATION_FAITHFULNESS_WEIGHT,
            hallucination: defaults::DEFAULT_GENERATION_HALLUCINATION_WEIGHT,
        }
    }
}

/// Confidence monitoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// `C_overall` below this emits a reroute action.
    pub overall_threshold: f64,
    /// Dispersion below this counts as "low" for the expand-search policy.
    pub low_dispersion_threshold: f64,
    /// Multiplier applied to a component whose collaborator was degraded.
    pub degraded_penalty: f64,
    pub retrieval_weights: RetrievalWeights,
    pub generation_weights: GenerationWeights,
    /// Elements a CP must mention to count as fully covered.
    pub cp_required_elements: Vec<String>,
    /// Elements an ATP must mention to count as fully covered.
    pub atp_required_elements: Vec<String>,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            overall_threshold: defaults::DEFAULT_OVERALL_THRESHOLD,
            low_dispersion_threshold: defaults::DEFAULT_LOW_DISPERSION_THRESHOLD,
            degraded_penalty: defaults::DEFAULT_DEGRADED_PENALTY,
            retrieval_weights: RetrievalWeights::default(),
            generation_weights: GenerationWeights::default(),
            cp_required_elements: defaults::DEFAULT_CP_REQUIRED_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            atp_required_elements: defaults::DEFAULT_ATP_REQUIRED_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
