use serde::{Deserialize, Serialize};

use super::defaults;

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity window on `AwaitingValidation` before a session expires.
    pub validation_timeout_secs: u64,
    /// How long terminal sessions stay in the archive.
    pub archive_retention_hours: u64,
    /// Live sessions allowed per user; the oldest is cancelled beyond this.
    pub max_sessions_per_user: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validation_timeout_secs: defaults::DEFAULT_VALIDATION_TIMEOUT_SECS,
            archive_retention_hours: defaults::DEFAULT_ARCHIVE_RETENTION_HOURS,
            max_sessions_per_user: defaults::DEFAULT_MAX_SESSIONS_PER_USER,
        }
    }
}
