//! Retry with exponential backoff for collaborator calls.

use std::time::Duration;

use syllabus_core::config::RetryConfig;
use syllabus_core::errors::{ExternalServiceError, ServiceKind};
use syllabus_observability::tracing_setup::events;

/// A call that failed on every try.
#[derive(Debug, Clone)]
pub struct Exhausted {
    pub error: ExternalServiceError,
    /// Tries made, including the first.
    pub tries: u32,
}

/// Runs an operation until it succeeds, fails permanently, or runs out of tries.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// No retries, no waiting.
    pub fn never() -> Self {
        Self::new(RetryConfig {
            max_tries: 1,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Only transient errors are retried.
    pub fn is_retryable(&self, error: &ExternalServiceError, tries: u32) -> bool {
        error.transient && tries < self.config.max_tries.max(1)
    }

    pub fn call<T>(
        &self,
        service: ServiceKind,
        mut op: impl FnMut() -> Result<T, ExternalServiceError>,
    ) -> Result<T, Exhausted> {
        let mut tries = 0;
        loop {
            tries += 1;
            match op() {
                Ok(value) => {
                    if tries > 1 {
                        tracing::debug!(service = %service, tries, "call succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) if self.is_retryable(&error, tries) => {
                    let backoff = self.config.backoff_for(tries);
                    events::collaborator_retry(
                        &service.to_string(),
                        tries,
                        backoff_ms(backoff),
                        &error.reason,
                    );
                    sleep(backoff);
                }
                Err(error) => {
                    tracing::warn!(service = %service, tries, error = %error, "call failed after retries");
                    return Err(Exhausted { error, tries });
                }
            }
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn backoff_ms(backoff: Duration) -> u64 {
    u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX)
}

fn sleep(backoff: Duration) {
    if !backoff.is_zero() {
        std::thread::sleep(backoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(max_tries: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_tries,
            initial_backoff_ms: 0,
            multiplier: 2.0,
            max_backoff_ms: 0,
        })
    }

    #[test]
    fn transient_errors_are_retried_until_success() {
        let mut calls = 0;
        let result = fast(3).call(ServiceKind::Retrieval, || {
            calls += 1;
            if calls < 3 {
                Err(ExternalServiceError::transient(ServiceKind::Retrieval, "timeout"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn permanent_errors_fail_immediately() {
        let mut calls = 0;
        let result: Result<(), _> = fast(3).call(ServiceKind::Generation, || {
            calls += 1;
            Err(ExternalServiceError::permanent(ServiceKind::Generation, "401"))
        });
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.tries, 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn tries_are_bounded() {
        let result: Result<(), _> = fast(3).call(ServiceKind::Retrieval, || {
            Err(ExternalServiceError::transient(ServiceKind::Retrieval, "503"))
        });
        assert_eq!(result.unwrap_err().tries, 3);
    }

    #[test]
    fn backoff_grows_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for(2), Duration::from_millis(400));
        assert_eq!(config.backoff_for(10), Duration::from_millis(2_000));
    }

    #[test]
    fn logged_backoff_saturates() {
        assert_eq!(backoff_ms(Duration::from_millis(1_500)), 1_500);
        assert_eq!(backoff_ms(Duration::MAX), u64::MAX);
    }
}
