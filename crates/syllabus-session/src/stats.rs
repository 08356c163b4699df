use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use syllabus_core::models::SessionState;

/// Registry-wide session counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub live: usize,
    pub archived: usize,
    /// State name → session count.
    pub by_state: BTreeMap<String, usize>,
}

impl RegistryStats {
    pub(crate) fn record(&mut self, state: SessionState, archived: bool) {
        if archived {
            self.archived += 1;
        } else {
            self.live += 1;
        }
        *self.by_state.entry(state.as_str().to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, state: SessionState) -> usize {
        self.by_state.get(state.as_str()).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.live + self.archived
    }

    /// Approved share of finished sessions; 0 when none finished.
    pub fn success_rate(&self) -> f64 {
        let finished: usize = SessionState::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .map(|s| self.count(*s))
            .sum();
        if finished == 0 {
            return 0.0;
        }
        self.count(SessionState::Approved) as f64 / finished as f64
    }
}
