//! Reroute policy applied when `C_overall` is below threshold.
//!
//! First match wins:
//! 1. strategy already failed confidence this session → `switch_strategy`
//! 2. retrieval limits and dispersion is low → `expand_search`
//! 3. generation limits and strategy is not adaptive → `regenerate`
//! 4. otherwise → `rewrite_query`

use syllabus_core::models::{LimitingFactor, RagStrategy, RerouteAction};

#[derive(Debug, Clone, Copy)]
pub struct RerouteContext {
    pub c_overall: f64,
    pub threshold: f64,
    pub limiting: LimitingFactor,
    pub dispersion: f64,
    pub low_dispersion_threshold: f64,
    pub strategy: RagStrategy,
    pub strategy_failed_before: bool,
}

pub fn choose(ctx: &RerouteContext) -> RerouteAction {
    if ctx.c_overall >= ctx.threshold {
        return RerouteAction::None;
    }
    if ctx.strategy_failed_before {
        return RerouteAction::SwitchStrategy;
    }
    match ctx.limiting {
        LimitingFactor::Retrieval if ctx.dispersion < ctx.low_dispersion_threshold => {
            RerouteAction::ExpandSearch
        }
        LimitingFactor::Generation if ctx.strategy != RagStrategy::Adaptive => {
            RerouteAction::Regenerate
        }
        _ => RerouteAction::RewriteQuery,
    }
}

/// Ties go to retrieval.
pub fn limiting_factor(c_r: f64, c_g: f64) -> LimitingFactor {
    if c_r <= c_g {
        LimitingFactor::Retrieval
    } else {
        LimitingFactor::Generation
    }
}
