use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::RetrievalFeatures;

/// The three strategy-fitness scores with the features they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreResult {
    #[serde(rename = "S_tmpl")]
    pub s_tmpl: f64,
    #[serde(rename = "S_adv")]
    pub s_adv: f64,
    #[serde(rename = "S_graph")]
    pub s_graph: f64,
    /// Feature snapshot, kept for audit.
    pub features: RetrievalFeatures,
}

impl ScoreResult {
    /// Highest of the three scores.
    pub fn max_score(&self) -> f64 {
        self.s_tmpl.max(self.s_adv).max(self.s_graph)
    }
}
