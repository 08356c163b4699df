//! Query features derived from request text alone.
//!
//! Used to fill the query-side fields of [`RetrievalFeatures`] when the
//! retrieval backend is unavailable, and by backends that do not compute them.

use std::collections::{BTreeSet, HashSet};

use syllabus_core::models::RetrievalFeatures;

use crate::text;

/// Connectives counted as relation mentions.
pub const RELATION_WORDS: [&str; 14] = [
    "dan", "atau", "dengan", "terhadap", "pada", "dari", "ke", "untuk", "and", "or", "with",
    "between", "versus", "vs",
];

/// Keywords that signal a relational query.
pub const RELATIONAL_KEYWORDS: [&str; 11] = [
    "hubungan",
    "relasi",
    "koneksi",
    "keterkaitan",
    "perbandingan",
    "konversi",
    "relationship",
    "relation",
    "connection",
    "comparison",
    "conversion",
];

/// Words shorter than this are not entity candidates.
const MIN_ENTITY_CHARS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryProfile {
    pub token_length: usize,
    /// Distinct lowercased entity candidates, sorted.
    pub entities: Vec<String>,
    pub relation_mentions: usize,
    pub relational_keyword: bool,
    /// Unique tokens over total tokens; 0 for empty text.
    pub specificity: f64,
}

impl QueryProfile {
    pub fn from_text(query: &str) -> Self {
        let tokens = text::tokenize(query);
        if tokens.is_empty() {
            return Self::default();
        }

        let relation_words: HashSet<&str> = RELATION_WORDS.into_iter().collect();
        let relation_mentions = tokens
            .iter()
            .filter(|t| relation_words.contains(t.as_str()))
            .count();

        let relational_keyword = tokens
            .iter()
            .any(|t| RELATIONAL_KEYWORDS.iter().any(|k| t.contains(k)));

        let entities: BTreeSet<String> = tokens
            .iter()
            .filter(|t| t.chars().count() >= MIN_ENTITY_CHARS)
            .filter(|t| !relation_words.contains(t.as_str()))
            .cloned()
            .collect();

        let unique: HashSet<&String> = tokens.iter().collect();
        let specificity = unique.len() as f64 / tokens.len() as f64;

        Self {
            token_length: tokens.len(),
            entities: entities.into_iter().collect(),
            relation_mentions,
            relational_keyword,
            specificity,
        }
    }

    /// Overwrite the query-side fields of `features` with this profile.
    pub fn apply_to(&self, features: &mut RetrievalFeatures) {
        features.token_length = self.token_length;
        features.entity_count = self.entities.len();
        features.relation_mentions = self.relation_mentions;
        features.relational_keyword = self.relational_keyword;
        features.specificity = self.specificity;
    }

    /// Features with no retrieval evidence, only what the text says.
    pub fn to_features(&self) -> RetrievalFeatures {
        let mut features = RetrievalFeatures::default();
        self.apply_to(&mut features);
        features
    }
}
