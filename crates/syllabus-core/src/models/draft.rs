use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generated CP/ATP content for one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CurriculumDraft {
    pub cp: String,
    pub atp: String,
}

enum Section {
    None,
    Cp,
    Atp,
}

impl CurriculumDraft {
    pub fn new(cp: impl Into<String>, atp: impl Into<String>) -> Self {
        Self {
            cp: cp.into(),
            atp: atp.into(),
        }
    }

    /// Parse generated text: a `{"cp", "atp"}` JSON object (possibly inside a
    /// code fence), otherwise `CP:` / `ATP:` sections. Text that matches
    /// neither form yields an empty draft.
    pub fn parse(text: &str) -> Self {
        if let Some(draft) = Self::parse_json(text) {
            return draft;
        }
        Self::parse_sections(text)
    }

    fn parse_json(text: &str) -> Option<Self> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        let draft: CurriculumDraft = serde_json::from_str(&text[start..=end]).ok()?;
        Some(draft.trimmed())
    }

    fn parse_sections(text: &str) -> Self {
        let mut cp = Vec::new();
        let mut atp = Vec::new();
        let mut section = Section::None;

        for line in text.lines() {
            let bare = line.trim().trim_start_matches(['#', '*', ' ']);
            let lower = bare.to_lowercase();
            if lower.starts_with("cp:") {
                section = Section::Cp;
                cp.push(bare[3..].trim().to_string());
                continue;
            }
            if lower.starts_with("atp:") {
                section = Section::Atp;
                atp.push(bare[4..].trim().to_string());
                continue;
            }
            match section {
                Section::Cp => cp.push(line.trim_end().to_string()),
                Section::Atp => atp.push(line.trim_end().to_string()),
                Section::None => {}
            }
        }

        Self {
            cp: cp.join("\n"),
            atp: atp.join("\n"),
        }
        .trimmed()
    }

    fn trimmed(self) -> Self {
        Self {
            cp: self.cp.trim().to_string(),
            atp: self.atp.trim().to_string(),
        }
    }

    /// Both fields carry text.
    pub fn is_complete(&self) -> bool {
        !self.cp.trim().is_empty() && !self.atp.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.cp.trim().is_empty() && self.atp.trim().is_empty()
    }

    /// CP followed by ATP, for term-level analysis.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.cp, self.atp)
    }

    /// blake3 hash of the draft, hex encoded.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.cp.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.atp.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}
