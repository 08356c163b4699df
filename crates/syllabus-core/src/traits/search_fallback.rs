use crate::errors::ExternalServiceError;

/// Web-search fallback, consulted when the vector store returns nothing.
pub trait ISearchFallback: Send + Sync {
    /// Return text snippets for the query.
    fn query(&self, text: &str) -> Result<Vec<String>, ExternalServiceError>;
}
