//! Canonical condition catalog
//!
//! Raw classifier labels are free-form ("caries_v2", "Gingivitis-x", ...).
//! The taxonomy folds them onto the six findings the application reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six dental findings the application recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Calculus,
    Caries,
    Gingivitis,
    #[serde(rename = "Tooth Discoloration")]
    ToothDiscoloration,
    #[serde(rename = "Mouth Ulcer")]
    MouthUlcer,
    Hypodontia,
}

impl Condition {
    /// All canonical conditions in catalog order.
    pub const ALL: [Condition; 6] = [
        Condition::Calculus,
        Condition::Caries,
        Condition::Gingivitis,
        Condition::ToothDiscoloration,
        Condition::MouthUlcer,
        Condition::Hypodontia,
    ];

    /// Human-readable canonical name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Condition::Calculus => "Calculus",
            Condition::Caries => "Caries",
            Condition::Gingivitis => "Gingivitis",
            Condition::ToothDiscoloration => "Tooth Discoloration",
            Condition::MouthUlcer => "Mouth Ulcer",
            Condition::Hypodontia => "Hypodontia",
        }
    }

    /// Resolve an exact canonical name. Use [`ConditionTaxonomy::match_label`]
    /// for raw classifier labels.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.display_name() == name)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Ordered `(condition, keywords)` rules. Order matters: the first rule with
/// a keyword contained in the label wins.
const RULES: &[(Condition, &[&str])] = &[
    (Condition::Calculus, &["calculus"]),
    (Condition::Caries, &["caries"]),
    (Condition::Gingivitis, &["gingivitis"]),
    (Condition::ToothDiscoloration, &["discoloration"]),
    (Condition::MouthUlcer, &["ulcer"]),
    (Condition::Hypodontia, &["hypodontia"]),
];

/// Keyword-substring matcher over the fixed catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionTaxonomy;

impl ConditionTaxonomy {
    pub fn new() -> Self {
        Self
    }

    /// Map a raw classifier label onto a canonical condition.
    ///
    /// Matching is case-insensitive substring containment. Labels that hit no
    /// rule yield `None` and are meant to be dropped by the caller.
    pub fn match_label(&self, raw_label: &str) -> Option<Condition> {
        let label = raw_label.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| label.contains(k)))
            .map(|(condition, _)| *condition)
    }
}
