use syllabus_core::config::ScoringConfig;
use syllabus_core::errors::ScoringError;
use syllabus_core::models::{RetrievalFeatures, ScoreResult};

use crate::formula;

/// Computes `{S_tmpl, S_adv, S_graph}` for validated retrieval features.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Validate then score. Malformed features are rejected before any
    /// selection happens.
    pub fn score(&self, features: &RetrievalFeatures) -> Result<ScoreResult, ScoringError> {
        let _span = tracing::debug_span!("score_engine.score").entered();
        Self::validate(features)?;

        let result = ScoreResult {
            s_tmpl: formula::template_score(features, &self.config.template),
            s_adv: formula::advanced_score(features, &self.config),
            s_graph: formula::graph_score(features, &self.config.graph),
            features: features.clone(),
        };
        tracing::debug!(
            s_tmpl = result.s_tmpl,
            s_adv = result.s_adv,
            s_graph = result.s_graph,
            "scores computed"
        );
        Ok(result)
    }

    /// Reject non-finite or out-of-range features.
    pub fn validate(features: &RetrievalFeatures) -> Result<(), ScoringError> {
        for (i, sim) in features.similarities.iter().enumerate() {
            check_unit(&format!("similarities[{i}]"), *sim)?;
        }
        check_unit("dispersion", features.dispersion)?;
        check_unit("subgraph_density", features.subgraph_density)?;
        check_unit("specificity", features.specificity)?;
        if let Some(margin) = features.margin {
            if !margin.is_finite() {
                return Err(invalid("margin", format!("{margin} is not finite")));
            }
        }
        if !features.source_ids.is_empty()
            && features.source_ids.len() != features.similarities.len()
        {
            return Err(invalid(
                "source_ids",
                format!(
                    "{} ids for {} similarities",
                    features.source_ids.len(),
                    features.similarities.len()
                ),
            ));
        }
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() {
        return Err(invalid(field, format!("{value} is not finite")));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("{value} outside [0, 1]")));
    }
    Ok(())
}

fn invalid(field: &str, reason: String) -> ScoringError {
    ScoringError::InvalidScoreInput {
        field: field.to_string(),
        reason,
    }
}
