//! Confidence-to-risk stratification

use serde::{Deserialize, Serialize};
use std::fmt;

use super::taxonomy::Condition;

/// Ordinal risk band. `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Safe",
            RiskLevel::Medium => "Monitor",
            RiskLevel::High => "See Dentist",
        }
    }

    /// Presentation color as a hex string. Only the UI reads this.
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#34C759",
            RiskLevel::Medium => "#FF9500",
            RiskLevel::High => "#FF3B30",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Two cut-points per condition. Comparisons are strict (`>`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBands {
    /// `None` means the High band is unreachable for this condition.
    pub high_above: Option<f64>,
    pub medium_above: f64,
}

impl RiskBands {
    const fn three(high_above: f64, medium_above: f64) -> Self {
        Self { high_above: Some(high_above), medium_above }
    }

    const fn two(medium_above: f64) -> Self {
        Self { high_above: None, medium_above }
    }

    pub fn classify(&self, confidence: f64) -> RiskLevel {
        match self.high_above {
            Some(high) if confidence > high => RiskLevel::High,
            _ if confidence > self.medium_above => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

/// Fixed per-condition thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskTable;

impl RiskTable {
    pub fn new() -> Self {
        Self
    }

    pub fn bands(&self, condition: Condition) -> RiskBands {
        match condition {
            Condition::Caries => RiskBands::three(0.7, 0.5),
            Condition::Gingivitis => RiskBands::three(0.8, 0.6),
            Condition::Hypodontia => RiskBands::three(0.8, 0.6),
            Condition::Calculus => RiskBands::two(0.6),
            Condition::MouthUlcer => RiskBands::two(0.7),
            Condition::ToothDiscoloration => RiskBands::two(0.7),
        }
    }

    pub fn stratify(&self, condition: Condition, confidence: f64) -> RiskLevel {
        self.bands(condition).classify(confidence)
    }

    /// Stratify by canonical name. Names outside the catalog are `Low`.
    pub fn stratify_name(&self, name: &str, confidence: f64) -> RiskLevel {
        match Condition::from_name(name) {
            Some(condition) => self.stratify(condition, confidence),
            None => RiskLevel::Low,
        }
    }
}
