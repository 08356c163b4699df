use crate::models::{RagStrategy, SessionState};

/// Refinement state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum RefinementError {
    #[error("invalid transition from {from} on {trigger}")]
    InvalidTransition { from: SessionState, trigger: String },

    #[error("strategies exhausted after {attempts} attempts (last: {last_strategy}); requires manual review")]
    StrategyExhausted {
        attempts: u32,
        last_strategy: RagStrategy,
    },
}
