//! Retrieval confidence `C_r`.

use std::collections::HashSet;

use syllabus_core::config::RetrievalWeights;
use syllabus_core::models::{RetrievalConfidence, RetrievalFeatures};

/// Component breakdown for `features`.
pub fn breakdown(features: &RetrievalFeatures) -> RetrievalConfidence {
    RetrievalConfidence {
        similarity: features.mean_similarity().clamp(0.0, 1.0),
        diversity: diversity(features),
        margin: if features.is_empty() {
            0.0
        } else {
            features.top_margin().clamp(0.0, 1.0)
        },
    }
}

/// Weighted mean of the breakdown, clamped to [0, 1].
pub fn aggregate(parts: &RetrievalConfidence, weights: &RetrievalWeights) -> f64 {
    let total = weights.similarity + weights.diversity + weights.margin;
    if total <= f64::EPSILON {
        return 0.0;
    }
    ((weights.similarity * parts.similarity
        + weights.diversity * parts.diversity
        + weights.margin * parts.margin)
        / total)
        .clamp(0.0, 1.0)
}

/// Marginal-relevance diversity over the top-k.
///
/// Walking hits from most to least similar, a hit contributes its similarity
/// only if its source has not been seen at a higher rank. The result is that
/// novel mass over total mass. Without provenance every hit counts as novel.
pub fn diversity(features: &RetrievalFeatures) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    if features.source_ids.len() != features.similarities.len() {
        return 1.0;
    }

    let mut ranked: Vec<(f64, &str)> = features
        .similarities
        .iter()
        .copied()
        .zip(features.source_ids.iter().map(String::as_str))
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = ranked.iter().map(|(sim, _)| sim).sum();
    if total <= f64::EPSILON {
        return 0.0;
    }

    let mut seen = HashSet::new();
    let novel: f64 = ranked
        .iter()
        .filter(|(_, source)| seen.insert(*source))
        .map(|(sim, _)| sim)
        .sum();
    (novel / total).clamp(0.0, 1.0)
}
