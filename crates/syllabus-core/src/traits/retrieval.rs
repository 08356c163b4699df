use crate::errors::ExternalServiceError;
use crate::models::{RetrievalFeatures, RetrievalQuery};

/// Vector-store retrieval backend.
pub trait IRetrievalService: Send + Sync {
    /// Run one retrieval and return the features the scoring engine needs.
    fn query(&self, query: &RetrievalQuery) -> Result<RetrievalFeatures, ExternalServiceError>;

    /// Human-readable backend name.
    fn name(&self) -> &str {
        "retrieval"
    }
}
