use serde::{Deserialize, Serialize};

use super::defaults;

/// Thresholds for the strategy selection rule chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// `S_tmpl` at or above this selects simple RAG.
    pub simple_threshold: f64,
    /// `S_adv` at or above this (with a complex query) selects advanced RAG.
    pub advanced_threshold: f64,
    /// `S_graph` at or above this (with a relational keyword) selects graph RAG.
    pub graph_threshold: f64,
    /// Token length strictly above this marks a query as complex.
    pub advanced_min_tokens: usize,
    /// Entity count at or above this marks a query as complex.
    pub advanced_min_entities: usize,
    /// `S_tmpl` above this keeps simple RAG as a fallback candidate.
    pub simple_fallback_score: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            simple_threshold: defaults::DEFAULT_SIMPLE_THRESHOLD,
            advanced_threshold: defaults::DEFAULT_ADVANCED_THRESHOLD,
            graph_threshold: defaults::DEFAULT_GRAPH_THRESHOLD,
            advanced_min_tokens: defaults::DEFAULT_ADVANCED_MIN_TOKENS,
            advanced_min_entities: defaults::DEFAULT_ADVANCED_MIN_ENTITIES,
            simple_fallback_score: defaults::DEFAULT_SIMPLE_FALLBACK_SCORE,
        }
    }
}
