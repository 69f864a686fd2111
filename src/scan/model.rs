//! Scan record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::risk::{RiskLevel, RiskTable};
use super::taxonomy::Condition;

/// A single finding inside a scan.
///
/// Fields are read-only; confidence is fixed when the result is stratified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredCondition")]
pub struct ConditionResult {
    id: Uuid,
    name: Condition,
    risk: RiskLevel,
    confidence: f64,
}

impl ConditionResult {
    /// Build a result from a classifier score, deriving risk from the table.
    pub fn stratified(name: Condition, score: f64, table: &RiskTable) -> Self {
        let confidence = clamp_confidence(score);
        Self::new(name, table.stratify(name, confidence), confidence)
    }

    /// Build a result with an explicit risk. Confidence is clamped to `[0, 1]`.
    pub fn new(name: Condition, risk: RiskLevel, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            risk,
            confidence: clamp_confidence(confidence),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Condition {
        self.name
    }

    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Same finding, ignoring the per-instance id.
    pub fn same_finding(&self, other: &ConditionResult) -> bool {
        self.name == other.name && self.risk == other.risk && self.confidence == other.confidence
    }
}

#[derive(Deserialize)]
struct StoredCondition {
    id: Uuid,
    name: Condition,
    risk: RiskLevel,
    confidence: f64,
}

impl From<StoredCondition> for ConditionResult {
    fn from(stored: StoredCondition) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            risk: stored.risk,
            confidence: clamp_confidence(stored.confidence),
        }
    }
}

/// NaN maps to 0.0; everything else is clamped into `[0, 1]`.
pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Per-risk counts for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskBreakdown {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// One completed capture-and-classify cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredScan")]
pub struct ScanResult {
    id: Uuid,
    timestamp: DateTime<Utc>,
    conditions: Vec<ConditionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_bytes: Option<Vec<u8>>,
}

#[derive(Deserialize)]
struct StoredScan {
    id: Uuid,
    timestamp: DateTime<Utc>,
    conditions: Vec<ConditionResult>,
    #[serde(default)]
    image_bytes: Option<Vec<u8>>,
}

impl TryFrom<StoredScan> for ScanResult {
    type Error = String;

    fn try_from(stored: StoredScan) -> Result<Self, Self::Error> {
        if stored.conditions.is_empty() {
            return Err(format!("scan {} has no conditions", stored.id));
        }
        Ok(Self::restore(stored.id, stored.timestamp, stored.conditions, stored.image_bytes))
    }
}

impl ScanResult {
    /// Create a scan stamped with the current time.
    pub fn new(conditions: Vec<ConditionResult>, image_bytes: Option<Vec<u8>>) -> Self {
        Self::at(Utc::now(), conditions, image_bytes)
    }

    /// Create a scan with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        conditions: Vec<ConditionResult>,
        image_bytes: Option<Vec<u8>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            conditions,
            image_bytes,
        }
    }

    /// Rehydrate a stored record without minting a new id.
    pub fn restore(
        id: Uuid,
        timestamp: DateTime<Utc>,
        conditions: Vec<ConditionResult>,
        image_bytes: Option<Vec<u8>>,
    ) -> Self {
        Self { id, timestamp, conditions, image_bytes }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn conditions(&self) -> &[ConditionResult] {
        &self.conditions
    }

    pub fn image_bytes(&self) -> Option<&[u8]> {
        self.image_bytes.as_deref()
    }

    pub fn breakdown(&self) -> RiskBreakdown {
        self.conditions.iter().fold(RiskBreakdown::default(), |mut acc, c| {
            match c.risk {
                RiskLevel::High => acc.high += 1,
                RiskLevel::Medium => acc.medium += 1,
                RiskLevel::Low => acc.low += 1,
            }
            acc
        })
    }

    /// Conditions ordered by descending confidence. Ties keep scan order.
    pub fn conditions_by_confidence(&self) -> Vec<&ConditionResult> {
        let mut sorted: Vec<&ConditionResult> = self.conditions.iter().collect();
        sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        sorted
    }
}
