//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use syllabus_core::config::ObservabilityConfig;
use syllabus_core::errors::{SyllabusError, SyllabusResult};
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "SYLLABUS_LOG";

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects `SYLLABUS_LOG` for filtering and defaults to `info`.
pub fn init_tracing() -> SyllabusResult<()> {
    init_tracing_with_config(&ObservabilityConfig::default())
}

/// Initialize tracing from configuration. `SYLLABUS_LOG` still wins over
/// the configured level when set.
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> SyllabusResult<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    let installed = if config.json {
        builder
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| SyllabusError::ConfigError {
        reason: format!("tracing subscriber: {e}"),
    })
}
