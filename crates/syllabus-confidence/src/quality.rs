//! Heuristic content quality report.

use std::collections::HashSet;

use syllabus_core::config::ConfidenceConfig;
use syllabus_core::models::{CurriculumDraft, QualityReport};

const EDUCATIONAL_KEYWORDS: [&str; 9] = [
    "pembelajaran",
    "siswa",
    "guru",
    "pendidikan",
    "kurikulum",
    "kompetensi",
    "indikator",
    "evaluasi",
    "materi",
];

const LOW_CONFIDENCE: f64 = 0.6;
const LOW_COMPLETENESS: f64 = 0.7;
const LOW_COHERENCE: f64 = 0.6;
const LOW_RELEVANCE: f64 = 0.8;

pub fn assess(draft: &CurriculumDraft, c_overall: f64, config: &ConfidenceConfig) -> QualityReport {
    let mut report = QualityReport {
        content_completeness: completeness(draft, config),
        content_coherence: coherence(draft),
        educational_relevance: relevance(draft),
        recommendations: Vec::new(),
    };

    if c_overall < LOW_CONFIDENCE {
        report
            .recommendations
            .push("Consider the adaptive strategy for better results".to_string());
    }
    if report.content_completeness < LOW_COMPLETENESS {
        report
            .recommendations
            .push("Generated content may be incomplete".to_string());
    }
    if report.content_coherence < LOW_COHERENCE {
        report
            .recommendations
            .push("CP and ATP coherence could be improved".to_string());
    }
    if report.educational_relevance < LOW_RELEVANCE {
        report
            .recommendations
            .push("Content may need more educational focus".to_string());
    }
    report
}

/// Mean of per-field required-element coverage.
pub fn completeness(draft: &CurriculumDraft, config: &ConfidenceConfig) -> f64 {
    let field = |text: &str, elements: &[String]| {
        if elements.is_empty() {
            return 1.0;
        }
        let text = text.to_lowercase();
        let found = elements
            .iter()
            .filter(|e| text.contains(&e.to_lowercase()))
            .count();
        found as f64 / elements.len() as f64
    };
    (field(&draft.cp, &config.cp_required_elements)
        + field(&draft.atp, &config.atp_required_elements))
        / 2.0
}

/// Shared CP/ATP vocabulary over total vocabulary, doubled and capped at 1.
pub fn coherence(draft: &CurriculumDraft) -> f64 {
    let cp_lower = draft.cp.to_lowercase();
    let atp_lower = draft.atp.to_lowercase();
    let cp: HashSet<&str> = cp_lower.split_whitespace().collect();
    let atp: HashSet<&str> = atp_lower.split_whitespace().collect();
    let total = cp.union(&atp).count();
    if total == 0 {
        return 0.0;
    }
    let common = cp.intersection(&atp).count();
    (common as f64 / total as f64 * 2.0).min(1.0)
}

pub fn relevance(draft: &CurriculumDraft) -> f64 {
    let content = draft.combined().to_lowercase();
    let found = EDUCATIONAL_KEYWORDS
        .iter()
        .filter(|k| content.contains(*k))
        .count();
    (found as f64 / EDUCATIONAL_KEYWORDS.len() as f64).min(1.0)
}
