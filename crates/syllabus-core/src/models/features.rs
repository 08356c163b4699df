use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query and retrieval features for one attempt, produced by the retrieval
/// collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct RetrievalFeatures {
    /// Top-k cosine similarities, in rank order.
    pub similarities: Vec<f64>,
    /// Source document id per hit, same order as `similarities`. May be empty.
    pub source_ids: Vec<String>,
    /// Explicit top-vs-runner-up margin. Computed from `similarities` when absent.
    pub margin: Option<f64>,
    /// Recognized entities in the query.
    pub entity_count: usize,
    /// Query length in tokens.
    pub token_length: usize,
    /// Spread of hits across distinct source documents, in [0, 1].
    pub dispersion: f64,
    /// Relation-word mentions in the query.
    pub relation_mentions: usize,
    /// Whether a relational keyword ("hubungan", "comparison", ...) appears.
    pub relational_keyword: bool,
    /// Density of the recognized-entity subgraph, in [0, 1].
    pub subgraph_density: f64,
    /// Inverse ambiguity of the query, in [0, 1].
    pub specificity: f64,
    /// Source text spans backing the hits, used for faithfulness.
    pub retrieved_spans: Vec<String>,
}

impl RetrievalFeatures {
    /// `μk`: mean of the top-k similarities, 0 with no hits.
    pub fn mean_similarity(&self) -> f64 {
        if self.similarities.is_empty() {
            return 0.0;
        }
        self.similarities.iter().sum::<f64>() / self.similarities.len() as f64
    }

    /// Raw margin between the best and second-best hit. 0 with fewer than two hits.
    pub fn top_margin(&self) -> f64 {
        if let Some(margin) = self.margin {
            return margin;
        }
        let mut sorted = self.similarities.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        match (sorted.first(), sorted.get(1)) {
            (Some(top), Some(second)) => top - second,
            _ => 0.0,
        }
    }

    /// No documents were retrieved.
    pub fn is_empty(&self) -> bool {
        self.similarities.is_empty()
    }
}
