//! Alert thresholds: more than 3 degradations of one service in an hour is a
//! warning; a service degraded for over an hour is critical.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use syllabus_core::errors::ServiceKind;

use super::tracker::DegradationTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub service: ServiceKind,
    pub message: String,
}

pub fn evaluate_alerts(tracker: &DegradationTracker, now: DateTime<Utc>) -> Vec<DegradationAlert> {
    let mut alerts = Vec::new();
    let mut seen = HashSet::new();

    for record in tracker.records() {
        let service = record.service;
        if !seen.insert(service) {
            continue;
        }

        if let Some(duration) = tracker.degraded_duration(service, now) {
            if duration > Duration::hours(1) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    service,
                    message: format!("{service} has been degraded for over an hour"),
                });
                continue;
            }
        }

        let recent = tracker.count_recent(service, 3600, now);
        if recent > 3 {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                service,
                message: format!("{service} degraded {recent} times in the last hour"),
            });
        }
    }

    alerts
}
