/// Score engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid score input: {field}: {reason}")]
    InvalidScoreInput { field: String, reason: String },
}
