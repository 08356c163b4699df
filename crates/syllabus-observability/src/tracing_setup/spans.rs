//! Span definitions per operation: session, attempt, scoring, confidence.

/// Create a session span.
#[macro_export]
macro_rules! session_span {
    ($session_id:expr) => {
        tracing::info_span!("syllabus.session", session_id = %$session_id)
    };
}

/// Create a span for one generation attempt.
#[macro_export]
macro_rules! attempt_span {
    ($session_id:expr, $attempt:expr) => {
        tracing::info_span!("syllabus.attempt", session_id = %$session_id, attempt = $attempt)
    };
}

/// Create a scoring + selection span.
#[macro_export]
macro_rules! scoring_span {
    ($attempt:expr) => {
        tracing::debug_span!("syllabus.scoring", attempt = $attempt)
    };
}

/// Create a confidence evaluation span.
#[macro_export]
macro_rules! confidence_span {
    ($attempt:expr, $strategy:expr) => {
        tracing::debug_span!("syllabus.confidence", attempt = $attempt, strategy = %$strategy)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SESSION: &str = "syllabus.session";
    pub const ATTEMPT: &str = "syllabus.attempt";
    pub const SCORING: &str = "syllabus.scoring";
    pub const CONFIDENCE: &str = "syllabus.confidence";
}
