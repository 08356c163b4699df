use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::BasicInfo;

/// `{C_r, C_g, C_overall}` triple as it appears in the Complete Input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConfidenceScores {
    #[serde(rename = "C_r")]
    pub c_r: f64,
    #[serde(rename = "C_g")]
    pub c_g: f64,
    #[serde(rename = "C_overall")]
    pub c_overall: f64,
}

impl ConfidenceScores {
    /// Full confidence, used for pre-supplied content.
    pub fn unit() -> Self {
        Self {
            c_r: 1.0,
            c_g: 1.0,
            c_overall: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurriculumContent {
    pub cp: String,
    pub atp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TechnicalInfo {
    pub llm_model: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompleteMetadata {
    pub orchestration_strategy: String,
    pub rag_strategy_used: String,
    pub confidence_scores: ConfidenceScores,
    pub attempt_count: u32,
    pub confidence_history: Vec<ConfidenceScores>,
}

/// The assembled record handed to the next pipeline stage.
///
/// Fields are private; once built the record is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompleteInput {
    basic_info: BasicInfo,
    curriculum_content: CurriculumContent,
    technical_info: TechnicalInfo,
    metadata: CompleteMetadata,
}

impl CompleteInput {
    pub fn new(
        basic_info: BasicInfo,
        curriculum_content: CurriculumContent,
        technical_info: TechnicalInfo,
        metadata: CompleteMetadata,
    ) -> Self {
        Self {
            basic_info,
            curriculum_content,
            technical_info,
            metadata,
        }
    }

    pub fn basic_info(&self) -> &BasicInfo {
        &self.basic_info
    }

    pub fn curriculum_content(&self) -> &CurriculumContent {
        &self.curriculum_content
    }

    pub fn technical_info(&self) -> &TechnicalInfo {
        &self.technical_info
    }

    pub fn metadata(&self) -> &CompleteMetadata {
        &self.metadata
    }

    pub fn is_complete(&self) -> bool {
        self.technical_info.status == crate::constants::COMPLETE_STATUS
    }
}
