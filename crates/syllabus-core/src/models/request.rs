use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constants::BASIC_INFO_FIELDS;

/// Identifying fields of a curriculum-authoring request. All are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BasicInfo {
    pub teacher_name: String,
    pub school_name: String,
    pub subject: String,
    pub grade: String,
    pub phase: String,
    pub topic: String,
    pub subtopic: String,
    pub time_allocation: String,
}

impl BasicInfo {
    /// Names of fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> Vec<String> {
        let values = [
            &self.teacher_name,
            &self.school_name,
            &self.subject,
            &self.grade,
            &self.phase,
            &self.topic,
            &self.subtopic,
            &self.time_allocation,
        ];
        BASIC_INFO_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// A submitted request. Immutable once a session owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Request {
    pub basic_info: BasicInfo,
    /// Existing CP text, if the teacher already has one.
    pub cp: Option<String>,
    /// Existing ATP text, if the teacher already has one.
    pub atp: Option<String>,
    /// Language model chosen for generation.
    pub llm_model: String,
    /// Owner, used for the per-user session cap.
    pub user_id: Option<String>,
}

impl Request {
    /// Supplied CP, ignoring blank text.
    pub fn supplied_cp(&self) -> Option<&str> {
        non_blank(self.cp.as_deref())
    }

    /// Supplied ATP, ignoring blank text.
    pub fn supplied_atp(&self) -> Option<&str> {
        non_blank(self.atp.as_deref())
    }

    /// Both CP and ATP were supplied.
    pub fn has_cp_atp(&self) -> bool {
        self.supplied_cp().is_some() && self.supplied_atp().is_some()
    }

    /// Content fields that still have to be generated.
    pub fn missing_content(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.supplied_cp().is_none() {
            missing.push("cp".to_string());
        }
        if self.supplied_atp().is_none() {
            missing.push("atp".to_string());
        }
        missing
    }

    /// Base retrieval text: subject, topic, and subtopic.
    pub fn query_text(&self) -> String {
        let info = &self.basic_info;
        [info.subject.trim(), info.topic.trim(), info.subtopic.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
