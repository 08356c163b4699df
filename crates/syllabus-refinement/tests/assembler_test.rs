mod common;

use common::*;
use syllabus_core::errors::AssemblyError;
use syllabus_core::models::{CurriculumDraft, RagStrategy};
use syllabus_refinement::CompleteInputAssembler;

// ── Field precedence ──

#[test]
fn supplied_cp_wins_over_generated() {
    let ctrl = controller(false);
    let mut request = test_fixtures::sample_request();
    request.cp = Some("Peserta didik mampu menyusun model linear.".into());
    let mut session = ctrl.open("sess-a", request, t0());
    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));

    let input = CompleteInputAssembler::new()
        .assemble_with(&session, Some(1), at(2))
        .unwrap();
    assert_eq!(
        input.curriculum_content().cp,
        "Peserta didik mampu menyusun model linear."
    );
    let generated = CurriculumDraft::parse(&test_fixtures::fakes::good_generation_text());
    assert_eq!(input.curriculum_content().atp, generated.atp.trim());
}

#[test]
fn nothing_approved_means_nothing_generated_is_used() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));

    let err = CompleteInputAssembler::new()
        .assemble(&session, at(2))
        .unwrap_err();
    let AssemblyError::IncompleteInput { missing } = err;
    assert_eq!(missing, vec!["cp".to_string(), "atp".to_string()]);
}

#[test]
fn missing_basic_fields_are_listed_first() {
    let ctrl = controller(false);
    let mut request = test_fixtures::supplied_request();
    request.basic_info.subject = "  ".into();
    request.atp = None;
    let session = ctrl.open("sess-b", request, t0());

    let err = CompleteInputAssembler::new()
        .assemble_with(&session, None, at(1))
        .unwrap_err();
    let AssemblyError::IncompleteInput { missing } = err;
    assert_eq!(missing, vec!["subject".to_string(), "atp".to_string()]);
}

// ── Metadata ──

#[test]
fn generated_metadata_points_at_the_approved_attempt() {
    let ctrl = controller(false);
    let mut session = open(&ctrl);
    run_attempt(&ctrl, &mut session, RagStrategy::Advanced, high(), at(1));
    ctrl.reject(&mut session, None, at(2)).unwrap();
    run_attempt(
        &ctrl,
        &mut session,
        RagStrategy::Graph,
        confidence(0.85, syllabus_core::models::RerouteAction::None),
        at(3),
    );
    let input = ctrl.approve(&mut session, at(4)).unwrap();

    let meta = input.metadata();
    assert_eq!(meta.rag_strategy_used, "graph");
    assert_eq!(meta.attempt_count, 2);
    assert_eq!(meta.confidence_scores.c_overall, 0.85);
    assert_eq!(meta.confidence_history.len(), 2);
    assert_eq!(input.technical_info().status, "complete");
    assert_eq!(input.technical_info().llm_model, "gpt-4o-mini");
}
