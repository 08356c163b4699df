use super::{AssemblyError, ExternalServiceError, RefinementError, ScoringError, SessionError};

/// Convenience alias used across the workspace.
pub type SyllabusResult<T> = Result<T, SyllabusError>;

/// Top-level error wrapping every subsystem error.
#[derive(Debug, thiserror::Error)]
pub enum SyllabusError {
    #[error("scoring error: {0}")]
    ScoringError(#[from] ScoringError),

    #[error("assembly error: {0}")]
    AssemblyError(#[from] AssemblyError),

    #[error("refinement error: {0}")]
    RefinementError(#[from] RefinementError),

    #[error("external service error: {0}")]
    ExternalServiceError(#[from] ExternalServiceError),

    #[error("session error: {0}")]
    SessionError(#[from] SessionError),

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// An attempt-level failure with the context needed for audit.
    #[error("session {session_id} attempt {attempt} failed ({trace}): {source}")]
    AttemptFailed {
        session_id: String,
        attempt: u32,
        trace: String,
        #[source]
        source: Box<SyllabusError>,
    },
}

impl SyllabusError {
    /// Wrap an error with session/attempt context.
    pub fn in_attempt(self, session_id: &str, attempt: u32, trace: impl Into<String>) -> Self {
        SyllabusError::AttemptFailed {
            session_id: session_id.to_string(),
            attempt,
            trace: trace.into(),
            source: Box::new(self),
        }
    }

    /// Whether the failure is a transient collaborator failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyllabusError::ExternalServiceError(e) => e.transient,
            SyllabusError::AttemptFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// The innermost error, with attempt context peeled off.
    pub fn root(&self) -> &SyllabusError {
        match self {
            SyllabusError::AttemptFailed { source, .. } => source.root(),
            other => other,
        }
    }
}
