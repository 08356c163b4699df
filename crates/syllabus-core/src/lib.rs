//! # syllabus-core
//!
//! Foundation crate for the Syllabus orchestration engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SyllabusConfig;
pub use errors::{SyllabusError, SyllabusResult};
pub use models::{
    BasicInfo, CompleteInput, ConfidenceResult, RagStrategy, RefinementAttempt, Request,
    RerouteAction, RetrievalFeatures, ScoreResult, SessionState, StrategyDecision,
};
