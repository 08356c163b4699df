/// Session registry errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {session_id}")]
    NotFound { session_id: String },

    #[error("session {session_id} timed out after {idle_secs}s awaiting validation")]
    Timeout { session_id: String, idle_secs: i64 },

    #[error("session {session_id} state lock poisoned")]
    LockPoisoned { session_id: String },
}
