//! What happens after a rejection: another attempt (possibly with a forced
//! strategy) or escalation.

use syllabus_core::config::RefinementConfig;
use syllabus_core::models::{EscalationReason, ForceReason, RagStrategy, RerouteAction};

use crate::log::AttemptLog;

#[derive(Debug, Clone, PartialEq)]
pub enum RefinementPlan {
    /// Run another attempt.
    Continue {
        forced: Option<(RagStrategy, ForceReason)>,
        reroute: RerouteAction,
    },
    Escalate(EscalationReason),
}

/// Decide the follow-up to a rejected attempt.
///
/// `last_reroute` is the monitor's action for the rejected attempt.
pub fn plan(log: &AttemptLog, last_reroute: RerouteAction, config: &RefinementConfig) -> RefinementPlan {
    let attempts = log.attempt_count();
    let last_strategy = log.strategy_for(attempts);

    if attempts >= config.max_attempts {
        return RefinementPlan::Escalate(match last_strategy {
            Some(last_strategy) if log.all_failed_confidence() => {
                EscalationReason::StrategyExhausted {
                    attempts,
                    last_strategy,
                }
            }
            _ => EscalationReason::AttemptsExhausted { attempts },
        });
    }

    let Some(last_strategy) = last_strategy else {
        return RefinementPlan::Continue {
            forced: None,
            reroute: last_reroute,
        };
    };

    let reason = if last_reroute == RerouteAction::SwitchStrategy {
        Some(ForceReason::Reroute)
    } else if repeatedly_rejected(log, config.same_strategy_rejection_limit) {
        Some(ForceReason::RepeatedRejection)
    } else {
        None
    };

    match reason {
        None => RefinementPlan::Continue {
            forced: None,
            reroute: last_reroute,
        },
        Some(reason) => match last_strategy.next() {
            Some(next) => RefinementPlan::Continue {
                forced: Some((next, reason)),
                reroute: last_reroute,
            },
            None if log.all_failed_confidence() => {
                RefinementPlan::Escalate(EscalationReason::StrategyExhausted {
                    attempts,
                    last_strategy,
                })
            }
            None => RefinementPlan::Escalate(EscalationReason::NoStrategyRemaining { last_strategy }),
        },
    }
}

/// The `limit` most recent rejections all used the same strategy.
pub fn repeatedly_rejected(log: &AttemptLog, limit: usize) -> bool {
    if limit == 0 {
        return false;
    }
    let rejected = log.rejected_strategies();
    if rejected.len() < limit {
        return false;
    }
    let recent = &rejected[rejected.len() - limit..];
    recent.iter().all(|s| *s == recent[0])
}
