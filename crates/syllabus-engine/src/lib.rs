//! # syllabus-engine
//!
//! The exposed surface: [`OrchestrationEngine`] accepts curriculum requests,
//! runs retrieval, scoring, strategy selection, generation, and confidence
//! monitoring per attempt, and drives each session through reviewer
//! validation to a Complete Input or escalation.

pub mod engine;
pub mod fallback;
pub mod prompt;
pub mod retry;

pub use engine::OrchestrationEngine;
pub use fallback::FallbackRetrieval;
pub use retry::{Exhausted, RetryPolicy};
