//! Strategy-fitness formulas.
//!
//! ```text
//! S_tmpl  = λ1·μk + λ2·Δ̂
//! S_adv   = α1·L' + α2·E' + α3·D + α4·S'
//! S_graph = β1·ρ' + β2·δ' + β3·I_pattern
//! ```
//!
//! Every score is clamped to [0.0, 1.0]. Inputs are assumed validated
//! (see [`crate::engine::ScoreEngine`]).

use std::collections::HashSet;

use syllabus_core::config::{AdvancedWeights, GraphWeights, ScoringConfig, TemplateWeights};
use syllabus_core::models::RetrievalFeatures;

/// Template-matching fitness. No documents yields 0.
pub fn template_score(features: &RetrievalFeatures, weights: &TemplateWeights) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let mu_k = features.mean_similarity();
    let margin = features.top_margin().clamp(0.0, 1.0);
    template_from_parts(mu_k, margin, weights)
}

/// `λ1·μk + λ2·Δ̂` from precomputed parts.
pub fn template_from_parts(mu_k: f64, margin: f64, weights: &TemplateWeights) -> f64 {
    (weights.lambda_1 * mu_k + weights.lambda_2 * margin).clamp(0.0, 1.0)
}

/// Advanced-RAG fitness.
pub fn advanced_score(features: &RetrievalFeatures, config: &ScoringConfig) -> f64 {
    let length = config.query_length.normalize(features.token_length as f64);
    let entities = config.entity_count.normalize(features.entity_count as f64);
    let dispersion = effective_dispersion(features);
    let specificity = if features.token_length == 0 {
        0.0
    } else {
        features.specificity
    };
    advanced_from_parts(length, entities, dispersion, specificity, &config.advanced)
}

/// `α1·L' + α2·E' + α3·D + α4·S'` from normalized parts.
pub fn advanced_from_parts(
    length: f64,
    entities: f64,
    dispersion: f64,
    specificity: f64,
    weights: &AdvancedWeights,
) -> f64 {
    (weights.alpha_1 * length
        + weights.alpha_2 * entities
        + weights.alpha_3 * dispersion
        + weights.alpha_4 * specificity)
        .clamp(0.0, 1.0)
}

/// Graph-RAG fitness.
pub fn graph_score(features: &RetrievalFeatures, weights: &GraphWeights) -> f64 {
    let density = relation_density(features);
    let pattern = if features.relational_keyword { 1.0 } else { 0.0 };
    (weights.beta_1 * density + weights.beta_2 * features.subgraph_density + weights.beta_3 * pattern)
        .clamp(0.0, 1.0)
}

/// `ρ'`: relation mentions per query token.
pub fn relation_density(features: &RetrievalFeatures) -> f64 {
    if features.token_length == 0 {
        return 0.0;
    }
    (features.relation_mentions as f64 / features.token_length as f64).clamp(0.0, 1.0)
}

/// Dispersion is 0 when every hit comes from a single known source.
pub fn effective_dispersion(features: &RetrievalFeatures) -> f64 {
    if !features.source_ids.is_empty() {
        let distinct: HashSet<&str> = features.source_ids.iter().map(String::as_str).collect();
        if distinct.len() <= 1 {
            return 0.0;
        }
    }
    features.dispersion
}
