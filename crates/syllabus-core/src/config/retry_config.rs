use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Backoff policy for external collaborator calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total tries per call, including the first.
    pub max_tries: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: f64,
    pub max_backoff_ms: u64,
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based), capped at `max_backoff_ms`.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let millis = self.initial_backoff_ms as f64 * self.multiplier.max(1.0).powi(exponent);
        let capped = millis.min(self.max_backoff_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_tries: defaults::DEFAULT_RETRY_MAX_TRIES,
            initial_backoff_ms: defaults::DEFAULT_RETRY_INITIAL_BACKOFF_MS,
            multiplier: defaults::DEFAULT_RETRY_MULTIPLIER,
            max_backoff_ms: defaults::DEFAULT_RETRY_MAX_BACKOFF_MS,
        }
    }
}
