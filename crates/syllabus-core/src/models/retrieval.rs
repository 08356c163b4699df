use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::RagStrategy;

/// Metadata filters passed to the retrieval collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RetrievalFilters {
    pub subject: String,
    pub grade: String,
    pub phase: String,
}

/// One retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RetrievalQuery {
    pub text: String,
    pub filters: RetrievalFilters,
    /// Reviewer feedback accumulated across attempts.
    pub constraints: Vec<String>,
    pub top_k: usize,
    pub strategy_hint: Option<RagStrategy>,
    /// The query text was rewritten after a low-confidence attempt.
    pub rewritten: bool,
}

impl RetrievalQuery {
    /// Query text followed by all constraints.
    pub fn full_text(&self) -> String {
        let mut parts = vec![self.text.as_str()];
        parts.extend(self.constraints.iter().map(String::as_str));
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Retrieved spans offered to the model as context.
    pub context: Vec<String>,
    pub model: String,
    pub strategy: RagStrategy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationResponse {
    pub text: String,
    pub token_usage: u32,
}
