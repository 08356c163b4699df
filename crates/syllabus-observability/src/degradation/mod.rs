//! Degradation tracking and alerting.

pub mod alerting;
pub mod tracker;

pub use alerting::{evaluate_alerts, AlertLevel, DegradationAlert};
pub use tracker::{DegradationRecord, DegradationTracker, RecoveryStatus};
