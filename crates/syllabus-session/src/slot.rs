//! One registry entry: the session lock and its cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use syllabus_core::errors::SessionError;
use syllabus_refinement::Session;

#[derive(Debug)]
pub struct SessionSlot {
    id: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    session: Mutex<Session>,
    cancel: AtomicBool,
}

impl SessionSlot {
    pub fn new(session: Session) -> Self {
        Self {
            id: session.id().to_string(),
            user_id: session.user_id().map(str::to_string),
            created_at: session.created_at(),
            session: Mutex::new(session),
            cancel: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Exclusive access to the session.
    pub fn lock(&self) -> Result<MutexGuard<'_, Session>, SessionError> {
        self.session.lock().map_err(|_| SessionError::LockPoisoned {
            session_id: self.id.clone(),
        })
    }

    /// Cloned snapshot of the session.
    pub fn snapshot(&self) -> Result<Session, SessionError> {
        Ok(self.lock()?.clone())
    }

    /// Ask a running pipeline to stop at its next step boundary.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}
