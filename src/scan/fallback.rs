//! Default findings used when classification produces nothing usable

use tracing::info;

use super::model::ConditionResult;
use super::risk::RiskLevel;
use super::taxonomy::Condition;

/// Fixed low confidences, one per canonical condition, in catalog order.
const DEFAULT_CONFIDENCES: [(Condition, f64); 6] = [
    (Condition::Calculus, 0.30),
    (Condition::Caries, 0.20),
    (Condition::Gingivitis, 0.25),
    (Condition::ToothDiscoloration, 0.35),
    (Condition::MouthUlcer, 0.10),
    (Condition::Hypodontia, 0.15),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy;

impl FallbackPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Pass non-empty results through; replace an empty set with the defaults.
    pub fn apply(&self, mapped: Vec<ConditionResult>) -> Vec<ConditionResult> {
        if !mapped.is_empty() {
            return mapped;
        }
        info!("No usable findings, substituting the default condition set");
        self.default_set()
    }

    /// Six `Low` findings with fresh ids.
    pub fn default_set(&self) -> Vec<ConditionResult> {
        DEFAULT_CONFIDENCES
            .iter()
            .map(|(condition, confidence)| ConditionResult::new(*condition, RiskLevel::Low, *confidence))
            .collect()
    }

    /// Whether `conditions` is exactly the default set.
    pub fn is_default_set(&self, conditions: &[ConditionResult]) -> bool {
        conditions.len() == DEFAULT_CONFIDENCES.len()
            && conditions.iter().zip(DEFAULT_CONFIDENCES.iter()).all(|(c, (name, conf))| {
                c.name() == *name && c.risk() == RiskLevel::Low && c.confidence() == *conf
            })
    }
}
