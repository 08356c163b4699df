pub mod analysis;
pub mod attempt;
pub mod complete_input;
pub mod confidence;
pub mod decision;
pub mod draft;
pub mod event;
pub mod features;
pub mod request;
pub mod retrieval;
pub mod score;
pub mod session_state;
pub mod status;
pub mod strategy;

pub use analysis::{ComplexityFactors, ComplexityLevel, TaskAnalysis};
pub use attempt::{DecisionSource, DegradedInfo, RefinementAttempt, UserDecision};
pub use complete_input::{
    CompleteInput, CompleteMetadata, ConfidenceScores, CurriculumContent, TechnicalInfo,
};
pub use confidence::{
    ConfidenceResult, GenerationConfidence, LimitingFactor, QualityReport, RerouteAction,
    RetrievalConfidence,
};
pub use decision::{DecisionRule, ForceReason, StrategyDecision};
pub use draft::CurriculumDraft;
pub use event::{EventKind, SessionEvent};
pub use features::RetrievalFeatures;
pub use request::{BasicInfo, Request};
pub use retrieval::{GenerationRequest, GenerationResponse, RetrievalFilters, RetrievalQuery};
pub use score::ScoreResult;
pub use session_state::{EscalationReason, SessionState};
pub use status::{Ack, SessionStatus, Validation};
pub use strategy::{OrchestrationStrategy, RagStrategy};
