//! Record every collaborator degradation: service, failure, fallback used,
//! timestamp, recovery status.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use syllabus_core::errors::ServiceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still failing.
    Active,
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationRecord {
    pub service: ServiceKind,
    pub failure: String,
    pub fallback: String,
    pub session_id: String,
    pub attempt: u32,
    pub timestamp: DateTime<Utc>,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degradations for alerting and reporting.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    records: Vec<DegradationRecord>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation.
    pub fn record(
        &mut self,
        service: ServiceKind,
        failure: &str,
        fallback: &str,
        session_id: &str,
        attempt: u32,
        now: DateTime<Utc>,
    ) {
        crate::tracing_setup::events::degradation_triggered(&service.to_string(), failure, fallback);
        self.records.push(DegradationRecord {
            service,
            failure: failure.to_string(),
            fallback: fallback.to_string(),
            session_id: session_id.to_string(),
            attempt,
            timestamp: now,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active degradation of `service` as recovered.
    pub fn mark_recovered(&mut self, service: ServiceKind, now: DateTime<Utc>) {
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.service == service && r.recovery_status == RecoveryStatus::Active)
        {
            record.recovery_status = RecoveryStatus::Recovered;
            record.recovered_at = Some(now);
        }
    }

    pub fn records(&self) -> &[DegradationRecord] {
        &self.records
    }

    pub fn active(&self) -> Vec<&DegradationRecord> {
        self.records
            .iter()
            .filter(|r| r.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, service: ServiceKind) -> bool {
        self.records
            .iter()
            .any(|r| r.service == service && r.recovery_status == RecoveryStatus::Active)
    }

    /// Degradations of `service` within the last `window_secs`.
    pub fn count_recent(&self, service: ServiceKind, window_secs: i64, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::seconds(window_secs);
        self.records
            .iter()
            .filter(|r| r.service == service && r.timestamp > cutoff)
            .count()
    }

    /// How long `service` has been continuously degraded.
    pub fn degraded_duration(&self, service: ServiceKind, now: DateTime<Utc>) -> Option<Duration> {
        let earliest = self
            .records
            .iter()
            .filter(|r| r.service == service && r.recovery_status == RecoveryStatus::Active)
            .map(|r| r.timestamp)
            .min()?;
        Some(now - earliest)
    }
}
