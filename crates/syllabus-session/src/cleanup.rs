//! Housekeeping passes over the registry.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use syllabus_core::errors::SyllabusResult;
use syllabus_refinement::RefinementController;

use crate::registry::SessionRegistry;
use crate::slot::SessionSlot;

/// Expire sessions idle in `AwaitingValidation` past the timeout, then
/// archive them. Returns the expired ids.
pub fn expire_idle(
    registry: &SessionRegistry,
    controller: &RefinementController,
    now: DateTime<Utc>,
) -> SyllabusResult<Vec<String>> {
    let candidates = registry.idle_awaiting(now)?;
    expire_candidates(registry, controller, candidates, now)
}

/// Expire the given candidates, re-checking each under its lock. A session
/// validated since it was picked is skipped.
pub fn expire_candidates(
    registry: &SessionRegistry,
    controller: &RefinementController,
    candidates: Vec<Arc<SessionSlot>>,
    now: DateTime<Utc>,
) -> SyllabusResult<Vec<String>> {
    let mut expired = Vec::new();
    for slot in candidates {
        let mut session = slot.lock()?;
        if !registry.is_idle(&session, now) {
            tracing::debug!(session_id = slot.id(), "skipping session validated since selection");
            continue;
        }
        controller.expire(&mut session, now)?;
        expired.push(slot.id().to_string());
    }
    for id in &expired {
        registry.archive(id)?;
    }
    if !expired.is_empty() {
        tracing::info!(count = expired.len(), "expired idle sessions");
    }
    Ok(expired)
}

/// Cancel the oldest sessions of `user_id` so that at most
/// `max_sessions_per_user - reserve` stay active. Returns the cancelled ids.
pub fn enforce_user_cap(
    registry: &SessionRegistry,
    controller: &RefinementController,
    user_id: &str,
    reserve: usize,
    now: DateTime<Utc>,
) -> SyllabusResult<Vec<String>> {
    let allowed = registry
        .config()
        .max_sessions_per_user
        .saturating_sub(reserve);
    let active = registry.active_for_user(user_id)?;
    let excess = active.len().saturating_sub(allowed);

    let mut cancelled = Vec::new();
    for slot in active.into_iter().take(excess) {
        slot.request_cancel();
        let mut session = slot.lock()?;
        if !session.is_terminal() {
            controller.cancel(&mut session, now)?;
        }
        drop(session);
        registry.archive(slot.id())?;
        cancelled.push(slot.id().to_string());
    }
    if !cancelled.is_empty() {
        tracing::info!(user_id, count = cancelled.len(), "cancelled sessions over per-user cap");
    }
    Ok(cancelled)
}

/// Remove archived sessions past the retention window.
pub fn purge_archive(registry: &SessionRegistry, now: DateTime<Utc>) -> SyllabusResult<usize> {
    let hours = i64::try_from(registry.config().archive_retention_hours).unwrap_or(i64::MAX);
    let Some(cutoff) = Duration::try_hours(hours).and_then(|d| now.checked_sub_signed(d)) else {
        return Ok(0);
    };
    let removed = registry.drop_archived_before(cutoff)?;
    if removed > 0 {
        tracing::info!(removed, "purged archived sessions");
    }
    Ok(removed)
}
