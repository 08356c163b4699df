//! SessionRegistry: concurrent per-session access via DashMap.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use syllabus_core::config::SessionConfig;
use syllabus_core::errors::SessionError;
use syllabus_core::models::SessionState;
use syllabus_refinement::Session;

use crate::slot::SessionSlot;
use crate::stats::RegistryStats;

/// Thread-safe registry. Mutation of one session never blocks another.
#[derive(Debug)]
pub struct SessionRegistry {
    config: SessionConfig,
    live: DashMap<String, Arc<SessionSlot>>,
    archive: DashMap<String, Arc<SessionSlot>>,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            live: DashMap::new(),
            archive: DashMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Register a new live session and return its slot.
    pub fn insert(&self, session: Session) -> Arc<SessionSlot> {
        let slot = Arc::new(SessionSlot::new(session));
        self.live.insert(slot.id().to_string(), Arc::clone(&slot));
        tracing::debug!(session_id = %slot.id(), live = self.live.len(), "session registered");
        slot
    }

    /// Look up a live or archived session.
    pub fn get(&self, session_id: &str) -> Result<Arc<SessionSlot>, SessionError> {
        self.live
            .get(session_id)
            .or_else(|| self.archive.get(session_id))
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SessionError::NotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Run `f` with exclusive access to one session.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let slot = self.get(session_id)?;
        let mut guard = slot.lock()?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self, session_id: &str) -> Result<Session, SessionError> {
        self.get(session_id)?.snapshot()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.live.contains_key(session_id) || self.archive.contains_key(session_id)
    }

    pub fn is_archived(&self, session_id: &str) -> bool {
        self.archive.contains_key(session_id)
    }

    /// Move a terminal session from the live map to the archive.
    /// Returns false if the session is missing or still live.
    pub fn archive(&self, session_id: &str) -> Result<bool, SessionError> {
        let Some(slot) = self.live.get(session_id).map(|e| Arc::clone(e.value())) else {
            return Ok(false);
        };
        if !slot.lock()?.is_terminal() {
            return Ok(false);
        }
        self.live.remove(session_id);
        self.archive.insert(session_id.to_string(), slot);
        tracing::debug!(session_id, "session archived");
        Ok(true)
    }

    /// Archive every live session that has reached a terminal state.
    pub fn archive_terminal(&self) -> Result<Vec<String>, SessionError> {
        let mut archived = Vec::new();
        for id in self.live_ids() {
            if self.archive(&id)? {
                archived.push(id);
            }
        }
        Ok(archived)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn archived_count(&self) -> usize {
        self.archive.len()
    }

    pub fn live_ids(&self) -> Vec<String> {
        self.live.iter().map(|r| r.key().clone()).collect()
    }

    /// Live, non-terminal sessions owned by `user_id`, oldest first.
    pub fn active_for_user(&self, user_id: &str) -> Result<Vec<Arc<SessionSlot>>, SessionError> {
        let mut slots = Vec::new();
        for slot in collect(&self.live) {
            if slot.user_id() == Some(user_id) && !slot.lock()?.is_terminal() {
                slots.push(slot);
            }
        }
        slots.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then(a.id().cmp(b.id())));
        Ok(slots)
    }

    /// Whether `session` has waited for validation past the timeout.
    pub fn is_idle(&self, session: &Session, now: DateTime<Utc>) -> bool {
        let timeout = i64::try_from(self.config.validation_timeout_secs).unwrap_or(i64::MAX);
        session.state() == SessionState::AwaitingValidation && session.idle_secs(now) > timeout
    }

    /// Live sessions awaiting validation for longer than the timeout.
    pub fn idle_awaiting(&self, now: DateTime<Utc>) -> Result<Vec<Arc<SessionSlot>>, SessionError> {
        let mut slots = Vec::new();
        for slot in collect(&self.live) {
            let expired = self.is_idle(&*slot.lock()?, now);
            if expired {
                slots.push(slot);
            }
        }
        Ok(slots)
    }

    /// Drop archived sessions whose last activity is older than retention.
    pub(crate) fn drop_archived_before(&self, cutoff: DateTime<Utc>) -> Result<usize, SessionError> {
        let mut stale = Vec::new();
        for slot in collect(&self.archive) {
            if slot.lock()?.last_activity() < cutoff {
                stale.push(slot.id().to_string());
            }
        }
        for id in &stale {
            self.archive.remove(id);
        }
        Ok(stale.len())
    }

    /// Totals per state across live and archived sessions.
    pub fn stats(&self) -> Result<RegistryStats, SessionError> {
        let mut stats = RegistryStats::default();
        for slot in collect(&self.live) {
            stats.record(slot.lock()?.state(), false);
        }
        for slot in collect(&self.archive) {
            stats.record(slot.lock()?.state(), true);
        }
        Ok(stats)
    }
}

/// Clone the slots out so no shard lock is held while a session lock is taken.
fn collect(map: &DashMap<String, Arc<SessionSlot>>) -> Vec<Arc<SessionSlot>> {
    map.iter().map(|entry| Arc::clone(entry.value())).collect()
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
