//! Session outcomes, strategy usage, reroutes, confidence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use syllabus_core::errors::SyllabusResult;
use syllabus_core::models::{RagStrategy, RerouteAction, SessionState};

const MAX_SAMPLES: usize = 10_000;

/// Orchestration counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationMetrics {
    pub sessions_started: u64,
    pub direct_completions: u64,
    /// Terminal state name → count.
    pub outcomes: BTreeMap<String, u64>,
    pub attempts: u64,
    /// Strategy name → attempts that used it.
    pub strategy_usage: BTreeMap<String, u64>,
    /// Reroute action name → times requested.
    pub reroutes: BTreeMap<String, u64>,
    pub forced_selections: u64,
    pub degraded_attempts: u64,
    pub total_tokens: u64,
    confidence_samples: Vec<f64>,
}

impl OrchestrationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_started(&mut self) {
        self.sessions_started += 1;
    }

    /// Record a terminal state.
    pub fn session_finished(&mut self, state: SessionState, direct: bool) {
        *self.outcomes.entry(state.as_str().to_string()).or_default() += 1;
        if direct && state == SessionState::Approved {
            self.direct_completions += 1;
        }
    }

    /// Record one generated attempt.
    pub fn attempt_generated(&mut self, strategy: RagStrategy, forced: bool, degraded: bool, tokens: u32) {
        self.attempts += 1;
        *self.strategy_usage.entry(strategy.as_str().to_string()).or_default() += 1;
        if forced {
            self.forced_selections += 1;
        }
        if degraded {
            self.degraded_attempts += 1;
        }
        self.total_tokens += u64::from(tokens);
    }

    /// Record a confidence result and the reroute it asked for.
    pub fn confidence_recorded(&mut self, c_overall: f64, reroute: RerouteAction) {
        if !reroute.is_none() {
            *self.reroutes.entry(reroute.as_str().to_string()).or_default() += 1;
        }
        self.confidence_samples.push(c_overall);
        if self.confidence_samples.len() > MAX_SAMPLES {
            self.confidence_samples
                .drain(..self.confidence_samples.len() - MAX_SAMPLES);
        }
    }

    pub fn outcome_count(&self, state: SessionState) -> u64 {
        self.outcomes.get(state.as_str()).copied().unwrap_or(0)
    }

    pub fn avg_confidence(&self) -> f64 {
        if self.confidence_samples.is_empty() {
            return 0.0;
        }
        self.confidence_samples.iter().sum::<f64>() / self.confidence_samples.len() as f64
    }

    /// Mean generated attempts per finished session.
    pub fn avg_attempts(&self) -> f64 {
        let finished: u64 = self.outcomes.values().sum();
        if finished == 0 {
            return 0.0;
        }
        self.attempts as f64 / finished as f64
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serialize counters plus derived averages.
    pub fn snapshot(&self) -> SyllabusResult<serde_json::Value> {
        let counters = serde_json::to_value(self)?;
        Ok(serde_json::json!({
            "counters": counters,
            "avg_confidence": self.avg_confidence(),
            "avg_attempts": self.avg_attempts(),
        }))
    }
}
