//! Raw classifier output → canonical condition results

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::{clamp_confidence, ConditionResult};
use super::risk::RiskTable;
use super::taxonomy::ConditionTaxonomy;

/// One `(label, score)` pair as emitted by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub label: String,
    #[serde(alias = "confidence")]
    pub score: f64,
}

impl RawObservation {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self { label: label.into(), score }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionMapper {
    taxonomy: ConditionTaxonomy,
    table: RiskTable,
}

impl ConditionMapper {
    pub fn new(taxonomy: ConditionTaxonomy, table: RiskTable) -> Self {
        Self { taxonomy, table }
    }

    /// Map observations in classifier order.
    ///
    /// Unmatched labels are skipped. Duplicate canonical names are all kept.
    pub fn map(&self, observations: &[RawObservation]) -> Vec<ConditionResult> {
        let mut results = Vec::with_capacity(observations.len());

        for obs in observations {
            let Some(condition) = self.taxonomy.match_label(&obs.label) else {
                debug!("Dropping unmatched label '{}'", obs.label);
                continue;
            };

            let score = clamp_confidence(obs.score);
            if score != obs.score {
                warn!("Score {} for '{}' outside [0, 1], clamped to {}", obs.score, obs.label, score);
            }

            results.push(ConditionResult::stratified(condition, score, &self.table));
        }

        results
    }
}
