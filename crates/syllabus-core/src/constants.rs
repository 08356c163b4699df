/// Prefix of every generated session id.
pub const SESSION_ID_PREFIX: &str = "rag-";

/// Number of hex characters taken from a v4 UUID for a session id.
pub const SESSION_ID_HEX_LEN: usize = 12;

/// Status stamped on every assembled Complete Input.
pub const COMPLETE_STATUS: &str = "complete";

/// Strategy label recorded when no retrieval strategy ran (pre-supplied CP/ATP).
pub const NO_STRATEGY_LABEL: &str = "none";

/// Basic-info field names, in the order they are reported when missing.
pub const BASIC_INFO_FIELDS: [&str; 8] = [
    "teacher_name",
    "school_name",
    "subject",
    "grade",
    "phase",
    "topic",
    "subtopic",
    "time_allocation",
];

/// Curriculum content fields that must be present before assembly.
pub const CONTENT_FIELDS: [&str; 2] = ["cp", "atp"];

/// Generate a new session id (`rag-` followed by 12 hex characters).
pub fn new_session_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{SESSION_ID_PREFIX}{}", &hex[..SESSION_ID_HEX_LEN])
}
