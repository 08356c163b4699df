#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use syllabus_core::config::{RefinementConfig, RetrievalConfig};
use syllabus_core::models::{
    ConfidenceResult, CurriculumDraft, DecisionRule, GenerationConfidence, LimitingFactor,
    QualityReport, RagStrategy, RerouteAction, RetrievalConfidence, ScoreResult, StrategyDecision,
};
use syllabus_refinement::{AttemptOutcome, RefinementController, Session};
use test_fixtures::fakes::good_generation_text;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn controller(auto_reroute: bool) -> RefinementController {
    RefinementController::new(
        RefinementConfig {
            auto_reroute,
            ..Default::default()
        },
        RetrievalConfig::default(),
    )
}

pub fn open(ctrl: &RefinementController) -> Session {
    ctrl.open("sess-1", test_fixtures::sample_request(), t0())
}

pub fn decision(strategy: RagStrategy) -> StrategyDecision {
    StrategyDecision {
        strategy,
        score: 0.7,
        rule: DecisionRule::ComplexQuery,
        rationale: "test".into(),
        scores: scores(),
        fallbacks: vec![RagStrategy::Adaptive],
    }
}

pub fn scores() -> ScoreResult {
    ScoreResult {
        s_tmpl: 0.4,
        s_adv: 0.7,
        s_graph: 0.3,
        features: test_fixtures::features_with(0.7, 0.1),
    }
}

pub fn outcome(strategy: RagStrategy) -> AttemptOutcome {
    AttemptOutcome {
        decision: decision(strategy),
        scores: scores(),
        features: test_fixtures::features_with(0.7, 0.1),
        draft: CurriculumDraft::parse(&good_generation_text()),
        token_usage: 420,
        degraded: Vec::new(),
    }
}

pub fn confidence(c_overall: f64, reroute: RerouteAction) -> ConfidenceResult {
    ConfidenceResult {
        c_r: c_overall,
        c_g: c_overall,
        c_overall,
        retrieval: RetrievalConfidence::default(),
        generation: GenerationConfidence::default(),
        limiting: LimitingFactor::Retrieval,
        reroute,
        degraded: false,
        quality: QualityReport::default(),
    }
}

pub fn high() -> ConfidenceResult {
    confidence(0.9, RerouteAction::None)
}

/// Generate and score one attempt.
pub fn run_attempt(
    ctrl: &RefinementController,
    session: &mut Session,
    strategy: RagStrategy,
    result: ConfidenceResult,
    now: DateTime<Utc>,
) -> syllabus_refinement::NextStep {
    ctrl.plan_attempt(session).unwrap();
    ctrl.record_generation(session, outcome(strategy), now).unwrap();
    ctrl.record_confidence(session, result, now).unwrap()
}
