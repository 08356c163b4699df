//! # syllabus-observability
//!
//! Tracing subscriber setup with span and event definitions, counters for
//! sessions and strategies, and tracking of collaborator degradations with
//! alerting.

pub mod degradation;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::{evaluate_alerts, AlertLevel, DegradationAlert, DegradationTracker};
pub use metrics::OrchestrationMetrics;
pub use tracing_setup::{init_tracing, init_tracing_with_config};
