//! # syllabus-confidence
//!
//! Estimates how trustworthy an attempt's output is.
//!
//! `C_r` rates the retrieval, `C_g` rates the generated CP/ATP, and
//! `C_overall = min(C_r, C_g)`. Below threshold a reroute action is chosen.

pub mod engine;
pub mod generation;
pub mod policy;
pub mod quality;
pub mod retrieval;

pub use engine::{ConfidenceInput, ConfidenceMonitor};
