//! Generation confidence `C_g`: schema coverage, faithfulness to retrieved
//! spans, and hallucination risk.

use std::collections::HashSet;

use syllabus_core::config::{ConfidenceConfig, GenerationWeights};
use syllabus_core::models::{CurriculumDraft, GenerationConfidence, Request};
use syllabus_scoring::text;

/// Tokens shorter than this are not content terms.
const MIN_TERM_CHARS: usize = 4;

pub fn breakdown(
    draft: &CurriculumDraft,
    spans: &[String],
    request: &Request,
    config: &ConfidenceConfig,
) -> GenerationConfidence {
    GenerationConfidence {
        coverage: coverage(draft, config),
        faithfulness: faithfulness(draft, spans),
        hallucination_risk: hallucination_risk(draft, spans, request),
    }
}

/// Weighted mean of coverage, faithfulness, and `1 − risk`, clamped to [0, 1].
pub fn aggregate(parts: &GenerationConfidence, weights: &GenerationWeights) -> f64 {
    let total = weights.coverage + weights.faithfulness + weights.hallucination;
    if total <= f64::EPSILON {
        return 0.0;
    }
    ((weights.coverage * parts.coverage
        + weights.faithfulness * parts.faithfulness
        + weights.hallucination * (1.0 - parts.hallucination_risk))
        / total)
        .clamp(0.0, 1.0)
}

/// Share of schema checks passed: both fields present plus each required
/// element mentioned in its field.
pub fn coverage(draft: &CurriculumDraft, config: &ConfidenceConfig) -> f64 {
    let cp = draft.cp.to_lowercase();
    let atp = draft.atp.to_lowercase();

    let mut checks = vec![!cp.trim().is_empty(), !atp.trim().is_empty()];
    checks.extend(
        config
            .cp_required_elements
            .iter()
            .map(|e| cp.contains(&e.to_lowercase())),
    );
    checks.extend(
        config
            .atp_required_elements
            .iter()
            .map(|e| atp.contains(&e.to_lowercase())),
    );

    let passed = checks.iter().filter(|ok| **ok).count();
    passed as f64 / checks.len() as f64
}

/// Share of the draft's content terms that appear in a retrieved span.
/// 0 without spans or without content.
pub fn faithfulness(draft: &CurriculumDraft, spans: &[String]) -> f64 {
    if spans.is_empty() {
        return 0.0;
    }
    let terms = content_terms(&draft.combined());
    if terms.is_empty() {
        return 0.0;
    }
    let source: HashSet<String> = spans.iter().flat_map(|s| text::tokenize(s)).collect();
    let grounded = terms.iter().filter(|t| source.contains(*t)).count();
    grounded as f64 / terms.len() as f64
}

/// Share of numerals and capitalized terms in the draft that appear in
/// neither the retrieved spans nor the request.
pub fn hallucination_risk(draft: &CurriculumDraft, spans: &[String], request: &Request) -> f64 {
    let combined = draft.combined();
    let mut candidates: HashSet<String> = text::numerals(&combined)
        .into_iter()
        .map(str::to_string)
        .collect();
    candidates.extend(
        text::raw_tokens(&combined)
            .into_iter()
            .filter(|t| t.chars().next().is_some_and(char::is_uppercase))
            .map(str::to_lowercase),
    );
    if candidates.is_empty() {
        return 0.0;
    }

    let known_text = known_text(spans, request);
    let mut known: HashSet<String> = text::tokenize(&known_text).into_iter().collect();
    known.extend(text::numerals(&known_text).into_iter().map(str::to_string));

    let unknown = candidates.iter().filter(|c| !known.contains(*c)).count();
    unknown as f64 / candidates.len() as f64
}

fn content_terms(text_in: &str) -> HashSet<String> {
    text::tokenize(text_in)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .collect()
}

fn known_text(spans: &[String], request: &Request) -> String {
    let info = &request.basic_info;
    let mut parts: Vec<&str> = spans.iter().map(String::as_str).collect();
    parts.extend([
        info.subject.as_str(),
        info.grade.as_str(),
        info.phase.as_str(),
        info.topic.as_str(),
        info.subtopic.as_str(),
        info.time_allocation.as_str(),
    ]);
    if let Some(cp) = request.supplied_cp() {
        parts.push(cp);
    }
    if let Some(atp) = request.supplied_atp() {
        parts.push(atp);
    }
    parts.join("\n")
}
