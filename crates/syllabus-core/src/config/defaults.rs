// Single source of truth for all default values.

// --- Scoring: template matching ---
pub const DEFAULT_LAMBDA_1: f64 = 0.8;
pub const DEFAULT_LAMBDA_2: f64 = 0.2;

// --- Scoring: advanced RAG ---
pub const DEFAULT_ALPHA_1: f64 = 0.3;
pub const DEFAULT_ALPHA_2: f64 = 0.25;
pub const DEFAULT_ALPHA_3: f64 = 0.25;
pub const DEFAULT_ALPHA_4: f64 = 0.2;
pub const DEFAULT_QUERY_LENGTH_MIN: f64 = 0.0;
pub const DEFAULT_QUERY_LENGTH_MAX: f64 = 30.0;
pub const DEFAULT_ENTITY_COUNT_MIN: f64 = 0.0;
pub const DEFAULT_ENTITY_COUNT_MAX: f64 = 5.0;

// --- Scoring: graph RAG ---
pub const DEFAULT_BETA_1: f64 = 0.4;
pub const DEFAULT_BETA_2: f64 = 0.4;
pub const DEFAULT_BETA_3: f64 = 0.2;

// --- Selection ---
pub const DEFAULT_SIMPLE_THRESHOLD: f64 = 0.85;
pub const DEFAULT_ADVANCED_THRESHOLD: f64 = 0.6;
pub const DEFAULT_GRAPH_THRESHOLD: f64 = 0.5;
pub const DEFAULT_ADVANCED_MIN_TOKENS: usize = 30;
pub const DEFAULT_ADVANCED_MIN_ENTITIES: usize = 2;
pub const DEFAULT_SIMPLE_FALLBACK_SCORE: f64 = 0.5;

// --- Confidence ---
pub const DEFAULT_OVERALL_THRESHOLD: f64 = 0.8;
pub const DEFAULT_LOW_DISPERSION_THRESHOLD: f64 = 0.3;
pub const DEFAULT_DEGRADED_PENALTY: f64 = 0.5;
pub const DEFAULT_RETRIEVAL_SIMILARITY_WEIGHT: f64 = 0.5;
pub const DEFAULT_RETRIEVAL_DIVERSITY_WEIGHT: f64 = 0.25;
pub const DEFAULT_RETRIEVAL_MARGIN_WEIGHT: f64 = 0.25;
pub const DEFAULT_GENERATION_COVERAGE_WEIGHT: f64 = 0.4;
pub const DEFAULT_GENERATION_FAITHFULNESS_WEIGHT: f64 = 0.4;
pub const DEFAULT_GENERATION_HALLUCINATION_WEIGHT: f64 = 0.2;
pub const DEFAULT_CP_REQUIRED_ELEMENTS: [&str; 3] = ["kompetensi", "mampu", "siswa"];
pub const DEFAULT_ATP_REQUIRED_ELEMENTS: [&str; 3] = ["tujuan", "pembelajaran", "indikator"];

// --- Refinement ---
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_AUTO_REROUTE: bool = true;
pub const DEFAULT_SAME_STRATEGY_REJECTION_LIMIT: usize = 2;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MAX_TOP_K: usize = 20;
pub const DEFAULT_TOP_K_EXPANSION_FACTOR: usize = 2;

// --- Session ---
pub const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 1800; // 30 minutes
pub const DEFAULT_ARCHIVE_RETENTION_HOURS: u64 = 24;
pub const DEFAULT_MAX_SESSIONS_PER_USER: usize = 5;

// --- Retry ---
pub const DEFAULT_RETRY_MAX_TRIES: u32 = 3;
pub const DEFAULT_RETRY_INITIAL_BACKOFF_MS: u64 = 200;
pub const DEFAULT_RETRY_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_RETRY_MAX_BACKOFF_MS: u64 = 2_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
