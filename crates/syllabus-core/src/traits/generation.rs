use crate::errors::ExternalServiceError;
use crate::models::{GenerationRequest, GenerationResponse};

/// Language-model completion backend.
pub trait IGenerationService: Send + Sync {
    fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, ExternalServiceError>;
}
