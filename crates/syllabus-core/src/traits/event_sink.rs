use crate::models::SessionEvent;

/// Push transport for session events. Publishing is fire-and-forget.
pub trait IEventSink: Send + Sync {
    fn publish(&self, event: &SessionEvent);
}
