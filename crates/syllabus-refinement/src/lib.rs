//! # syllabus-refinement
//!
//! The refinement loop: an explicit `(state, trigger) → state` table, an
//! append-only attempt log, the downgrade/reroute policy applied between
//! attempts, and assembly of the final Complete Input.

pub mod assembler;
pub mod controller;
pub mod log;
pub mod policy;
pub mod session;
pub mod state;

pub use assembler::CompleteInputAssembler;
pub use controller::{AttemptOutcome, AttemptPlan, NextStep, RefinementController};
pub use log::AttemptLog;
pub use session::Session;
pub use state::Trigger;
