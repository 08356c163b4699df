//! # syllabus-scoring
//!
//! Scores a request against the three retrieval strategies and selects exactly
//! one of them with an ordered rule chain.
//!
//! - [`formula`]: pure `S_tmpl`, `S_adv`, `S_graph` computations
//! - [`engine::ScoreEngine`]: feature validation + scoring
//! - [`selector::StrategySelector`]: first-match rule chain
//! - [`profile::QueryProfile`]: query features derived from text
//! - [`analysis::TaskAnalyzer`]: up-front complexity analysis

pub mod analysis;
pub mod engine;
pub mod formula;
pub mod profile;
pub mod selector;
pub mod text;

pub use analysis::TaskAnalyzer;
pub use engine::ScoreEngine;
pub use profile::QueryProfile;
pub use selector::{SelectionRule, StrategySelector};
