//! Retrieval adapter that fills empty results from a search fallback.

use std::sync::Arc;

use syllabus_core::errors::ExternalServiceError;
use syllabus_core::models::{RetrievalFeatures, RetrievalQuery};
use syllabus_core::traits::{IRetrievalService, ISearchFallback};

/// Similarity assigned to fallback snippets; they are unranked.
const FALLBACK_SIMILARITY: f64 = 0.3;

/// Wraps a primary retrieval. When it returns no hits, search snippets are
/// used as low-similarity evidence from distinct sources.
pub struct FallbackRetrieval {
    primary: Arc<dyn IRetrievalService>,
    search: Arc<dyn ISearchFallback>,
}

impl FallbackRetrieval {
    pub fn new(primary: Arc<dyn IRetrievalService>, search: Arc<dyn ISearchFallback>) -> Self {
        Self { primary, search }
    }
}

impl IRetrievalService for FallbackRetrieval {
    fn query(&self, query: &RetrievalQuery) -> Result<RetrievalFeatures, ExternalServiceError> {
        let features = self.primary.query(query)?;
        if !features.is_empty() {
            return Ok(features);
        }

        let snippets = match self.search.query(&query.full_text()) {
            Ok(snippets) => snippets,
            Err(e) => {
                tracing::debug!(error = %e, "search fallback unavailable");
                return Ok(features);
            }
        };
        let snippets: Vec<String> = snippets
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .take(query.top_k.max(1))
            .collect();
        if snippets.is_empty() {
            return Ok(features);
        }

        tracing::debug!(count = snippets.len(), "filled retrieval from search fallback");
        Ok(RetrievalFeatures {
            similarities: vec![FALLBACK_SIMILARITY; snippets.len()],
            source_ids: (0..snippets.len()).map(|i| format!("search:{i}")).collect(),
            retrieved_spans: snippets,
            ..features
        })
    }

    fn name(&self) -> &str {
        "retrieval+search"
    }
}
