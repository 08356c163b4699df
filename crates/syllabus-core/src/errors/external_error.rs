use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which external collaborator a call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Retrieval,
    Generation,
    SearchFallback,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceKind::Retrieval => "retrieval",
            ServiceKind::Generation => "generation",
            ServiceKind::SearchFallback => "search_fallback",
        };
        f.write_str(name)
    }
}

/// Failure reported by a retrieval, generation, or search backend.
///
/// Only transient failures are retried.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{service} backend failed: {reason}")]
pub struct ExternalServiceError {
    pub service: ServiceKind,
    pub reason: String,
    pub transient: bool,
}

impl ExternalServiceError {
    /// A failure worth retrying (timeouts, 5xx, rate limits).
    pub fn transient(service: ServiceKind, reason: impl Into<String>) -> Self {
        Self {
            service,
            reason: reason.into(),
            transient: true,
        }
    }

    /// A failure that will not go away on retry (bad request, auth).
    pub fn permanent(service: ServiceKind, reason: impl Into<String>) -> Self {
        Self {
            service,
            reason: reason.into(),
            transient: false,
        }
    }
}
