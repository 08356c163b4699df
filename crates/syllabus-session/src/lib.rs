//! # syllabus-session
//!
//! Live sessions keyed by id, each behind its own lock, plus an archive of
//! finished sessions kept for audit until retention runs out.

pub mod cleanup;
pub mod registry;
pub mod slot;
pub mod stats;

pub use cleanup::{enforce_user_cap, expire_candidates, expire_idle, purge_archive};
pub use registry::SessionRegistry;
pub use slot::SessionSlot;
pub use stats::RegistryStats;
