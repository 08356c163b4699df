//! Configuration for every subsystem, loaded from TOML.
//!
//! Every section carries `#[serde(default)]`, so an empty document yields the
//! tuned defaults from [`defaults`].

pub mod confidence_config;
pub mod defaults;
pub mod observability_config;
pub mod refinement_config;
pub mod retrieval_config;
pub mod retry_config;
pub mod scoring_config;
pub mod selection_config;
pub mod session_config;

use serde::{Deserialize, Serialize};

pub use confidence_config::{ConfidenceConfig, GenerationWeights, RetrievalWeights};
pub use observability_config::ObservabilityConfig;
pub use refinement_config::RefinementConfig;
pub use retrieval_config::RetrievalConfig;
pub use retry_config::RetryConfig;
pub use scoring_config::{AdvancedWeights, GraphWeights, NormalizationRange, ScoringConfig, TemplateWeights};
pub use selection_config::SelectionConfig;
pub use session_config::SessionConfig;

use crate::errors::{SyllabusError, SyllabusResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyllabusConfig {
    pub scoring: ScoringConfig,
    pub selection: SelectionConfig,
    pub confidence: ConfidenceConfig,
    pub refinement: RefinementConfig,
    pub retrieval: RetrievalConfig,
    pub session: SessionConfig,
    pub retry: RetryConfig,
    pub observability: ObservabilityConfig,
}

impl SyllabusConfig {
    /// Parse a TOML document. Missing sections and fields fall back to defaults.
    pub fn from_toml(source: &str) -> SyllabusResult<Self> {
        toml::from_str(source).map_err(|e| SyllabusError::ConfigError {
            reason: e.to_string(),
        })
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> SyllabusResult<String> {
        toml::to_string(self).map_err(|e| SyllabusError::ConfigError {
            reason: e.to_string(),
        })
    }
}
