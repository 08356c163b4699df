use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights for `S_tmpl = λ1·μk + λ2·Δ̂`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateWeights {
    pub lambda_1: f64,
    pub lambda_2: f64,
}

impl Default for TemplateWeights {
    fn default() -> Self {
        Self {
            lambda_1: defaults::DEFAULT_LAMBDA_1,
            lambda_2: defaults::DEFAULT_LAMBDA_2,
        }
    }
}

/// Weights for `S_adv = α1·L' + α2·E' + α3·D + α4·S'`. Not required to sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedWeights {
    pub alpha_1: f64,
    pub alpha_2: f64,
    pub alpha_3: f64,
    pub alpha_4: f64,
}

impl Default for AdvancedWeights {
    fn default() -> Self {
        Self {
            alpha_1: defaults::DEFAULT_ALPHA_1,
            alpha_2: defaults::DEFAULT_ALPHA_2,
            alpha_3: defaults::DEFAULT_ALPHA_3,
            alpha_4: defaults::DEFAULT_ALPHA_4,
        }
    }
}

/// Weights for `S_graph = β1·ρ' + β2·δ' + β3·I_pattern`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphWeights {
    pub beta_1: f64,
    pub beta_2: f64,
    pub beta_3: f64,
}

impl Default for GraphWeights {
    fn default() -> Self {
        Self {
            beta_1: defaults::DEFAULT_BETA_1,
            beta_2: defaults::DEFAULT_BETA_2,
            beta_3: defaults::DEFAULT_BETA_3,
        }
    }
}

/// Min-max range used to normalize a raw count into [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalizationRange {
    pub min: f64,
    pub max: f64,
}

impl NormalizationRange {
    /// Min-max normalize `value`, clamped to [0, 1]. A degenerate range yields 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Scoring subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub template: TemplateWeights,
    pub advanced: AdvancedWeights,
    pub graph: GraphWeights,
    /// Normalization range for query token length (L').
    pub query_length: NormalizationRange,
    /// Normalization range for entity count (E').
    pub entity_count: NormalizationRange,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            template: TemplateWeights::default(),
            advanced: AdvancedWeights::default(),
            graph: GraphWeights::default(),
            query_length: NormalizationRange {
                min: defaults::DEFAULT_QUERY_LENGTH_MIN,
                max: defaults::DEFAULT_QUERY_LENGTH_MAX,
            },
            entity_count: NormalizationRange {
                min: defaults::DEFAULT_ENTITY_COUNT_MIN,
                max: defaults::DEFAULT_ENTITY_COUNT_MAX,
            },
        }
    }
}
