//! Up-front task analysis: complexity, missing components, orchestration
//! path, and a processing-time estimate.

use syllabus_core::models::{
    ComplexityFactors, ComplexityLevel, OrchestrationStrategy, RagStrategy, Request, TaskAnalysis,
};

use crate::text;

const COMPLEX_TOPIC_KEYWORDS: [&str; 5] = ["advanced", "kompleks", "analisis", "sintesis", "evaluasi"];
const COMPLEX_SUBJECTS: [&str; 4] = ["matematika", "fisika", "kimia", "biologi"];
const COMPLEX_SUBJECT_SCORE: f64 = 0.8;
const OTHER_SUBJECT_SCORE: f64 = 0.4;
const MAX_GRADE: f64 = 12.0;
const REFERENCE_MINUTES: f64 = 120.0;
/// Used when grade or time allocation carries no number.
const UNKNOWN_FACTOR: f64 = 0.5;

const SIMPLE_BELOW: f64 = 0.3;
const MEDIUM_BELOW: f64 = 0.7;

const BASE_SECS: u32 = 30;
const PER_MISSING_COMPONENT_SECS: u32 = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskAnalyzer;

impl TaskAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, request: &Request) -> TaskAnalysis {
        let info = &request.basic_info;
        let factors = ComplexityFactors {
            topic: topic_complexity(&info.topic, &info.subtopic),
            subject: subject_complexity(&info.subject),
            grade: grade_complexity(&info.grade),
            time: time_complexity(&info.time_allocation),
        };
        let complexity_score = (factors.topic + factors.subject + factors.grade + factors.time) / 4.0;
        let complexity_level = level_for(complexity_score);

        let missing_components = request.missing_content();
        let orchestration = if missing_components.is_empty() {
            OrchestrationStrategy::Direct
        } else {
            OrchestrationStrategy::CpAtpGeneration
        };

        let estimated_processing_secs =
            estimate_processing_secs(complexity_level, missing_components.len(), None);

        TaskAnalysis {
            complexity_level,
            complexity_score,
            factors,
            missing_components,
            orchestration,
            estimated_processing_secs,
        }
    }
}

/// 30s base, plus complexity, missing components, and strategy surcharges.
pub fn estimate_processing_secs(
    level: ComplexityLevel,
    missing_components: usize,
    strategy: Option<RagStrategy>,
) -> u32 {
    let complexity = match level {
        ComplexityLevel::Simple => 0,
        ComplexityLevel::Medium => 15,
        ComplexityLevel::Complex => 30,
    };
    let strategy = match strategy {
        Some(RagStrategy::Advanced) => 20,
        Some(RagStrategy::Graph) => 40,
        Some(RagStrategy::Adaptive) => 60,
        Some(RagStrategy::Simple) | None => 0,
    };
    BASE_SECS + complexity + PER_MISSING_COMPONENT_SECS * missing_components as u32 + strategy
}

pub fn level_for(score: f64) -> ComplexityLevel {
    if score < SIMPLE_BELOW {
        ComplexityLevel::Simple
    } else if score < MEDIUM_BELOW {
        ComplexityLevel::Medium
    } else {
        ComplexityLevel::Complex
    }
}

fn topic_complexity(topic: &str, subtopic: &str) -> f64 {
    let content = format!("{topic} {subtopic}").to_lowercase();
    let hits = COMPLEX_TOPIC_KEYWORDS
        .iter()
        .filter(|k| content.contains(*k))
        .count();
    (hits as f64 / COMPLEX_TOPIC_KEYWORDS.len() as f64).min(1.0)
}

fn subject_complexity(subject: &str) -> f64 {
    let subject = subject.trim().to_lowercase();
    if COMPLEX_SUBJECTS.contains(&subject.as_str()) {
        COMPLEX_SUBJECT_SCORE
    } else {
        OTHER_SUBJECT_SCORE
    }
}

/// All digits of the grade read as one number ("Kelas 1 0" is grade 10).
fn grade_complexity(grade: &str) -> f64 {
    let digits: String = grade.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(n) => (n as f64 / MAX_GRADE).min(1.0),
        Err(_) => UNKNOWN_FACTOR,
    }
}

/// First number in the allocation, read as minutes.
fn time_complexity(allocation: &str) -> f64 {
    match text::integers(allocation).first() {
        Some(&minutes) => (minutes as f64 / REFERENCE_MINUTES).min(1.0),
        None => UNKNOWN_FACTOR,
    }
}
