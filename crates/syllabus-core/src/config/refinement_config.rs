use serde::{Deserialize, Serialize};

use super::defaults;

/// Refinement loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Generated attempts allowed before the session escalates. Default: 3.
    pub max_attempts: u32,
    /// Reject low-confidence attempts automatically instead of waiting for a reviewer.
    pub auto_reroute: bool,
    /// Consecutive rejections of one strategy that force the next strategy. Default: 2.
    pub same_strategy_rejection_limit: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            auto_reroute: defaults::DEFAULT_AUTO_REROUTE,
            same_strategy_rejection_limit: defaults::DEFAULT_SAME_STRATEGY_REJECTION_LIMIT,
        }
    }
}
