use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval query shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Documents requested on a first attempt.
    pub default_top_k: usize,
    /// Upper bound after search expansion.
    pub max_top_k: usize,
    /// Multiplier applied to top-k by the expand-search reroute.
    pub expansion_factor: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: defaults::DEFAULT_TOP_K,
            max_top_k: defaults::DEFAULT_MAX_TOP_K,
            expansion_factor: defaults::DEFAULT_TOP_K_EXPANSION_FACTOR,
        }
    }
}
