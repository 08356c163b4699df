//! Transition table for the refinement state machine.
//!
//! ```text
//! Initial ──generate──▶ Generated ──confidence_computed──▶ AwaitingValidation
//!    │                      ▲                                 │ approve → Approved
//!    │ supplied → Approved  │ generate                        │ reject  → Rejected
//!    │ escalate → Escalated │                                 │ expire  → Expired
//!                        Refining ◀──refine── Rejected
//!                           │ escalate → Escalated
//! any non-terminal ──cancel──▶ Cancelled
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use syllabus_core::errors::RefinementError;
use syllabus_core::models::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Generate,
    Supplied,
    ConfidenceComputed,
    Approve,
    Reject,
    Expire,
    Refine,
    Escalate,
    Cancel,
}

impl Trigger {
    pub const ALL: [Trigger; 9] = [
        Trigger::Generate,
        Trigger::Supplied,
        Trigger::ConfidenceComputed,
        Trigger::Approve,
        Trigger::Reject,
        Trigger::Expire,
        Trigger::Refine,
        Trigger::Escalate,
        Trigger::Cancel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Generate => "generate",
            Trigger::Supplied => "supplied",
            Trigger::ConfidenceComputed => "confidence_computed",
            Trigger::Approve => "approve",
            Trigger::Reject => "reject",
            Trigger::Expire => "expire",
            Trigger::Refine => "refine",
            Trigger::Escalate => "escalate",
            Trigger::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use SessionState as S;

/// Every legal `(from, trigger, to)` triple except cancellation, which is
/// legal from any non-terminal state.
pub const TRANSITIONS: [(SessionState, Trigger, SessionState); 10] = [
    (S::Initial, Trigger::Generate, S::Generated),
    (S::Initial, Trigger::Supplied, S::Approved),
    (S::Initial, Trigger::Escalate, S::Escalated),
    (S::Generated, Trigger::ConfidenceComputed, S::AwaitingValidation),
    (S::AwaitingValidation, Trigger::Approve, S::Approved),
    (S::AwaitingValidation, Trigger::Reject, S::Rejected),
    (S::AwaitingValidation, Trigger::Expire, S::Expired),
    (S::Rejected, Trigger::Refine, S::Refining),
    (S::Refining, Trigger::Generate, S::Generated),
    (S::Refining, Trigger::Escalate, S::Escalated),
];

/// Look up the target state, if the pair is in the table.
pub fn next_state(from: SessionState, trigger: Trigger) -> Option<SessionState> {
    if trigger == Trigger::Cancel {
        return (!from.is_terminal()).then_some(S::Cancelled);
    }
    TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == trigger)
        .map(|(_, _, to)| *to)
}

pub fn transition(from: SessionState, trigger: Trigger) -> Result<SessionState, RefinementError> {
    next_state(from, trigger).ok_or_else(|| RefinementError::InvalidTransition {
        from,
        trigger: trigger.to_string(),
    })
}
