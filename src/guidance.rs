//! Condition guidance catalog
//!
//! Static educational copy shown next to a finding: what the condition is,
//! how urgent its risk band is, and what to do about it.

use crate::scan::{Condition, ConditionResult, RiskLevel};

/// Headline and message for a risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    pub title: &'static str,
    pub message: &'static str,
}

pub fn advisory(risk: RiskLevel) -> Advisory {
    match risk {
        RiskLevel::High => Advisory {
            title: "Urgent Attention Required",
            message: "This condition requires immediate professional attention. Please schedule an appointment with your dentist as soon as possible.",
        },
        RiskLevel::Medium => Advisory {
            title: "Monitor Closely",
            message: "This condition should be monitored and addressed. Consider scheduling a dental appointment within the next few weeks.",
        },
        RiskLevel::Low => Advisory {
            title: "Generally Safe",
            message: "This condition is at a manageable level. Continue with good oral hygiene and regular dental check-ups.",
        },
    }
}

pub fn description(condition: Condition) -> &'static str {
    match condition {
        Condition::Calculus => "Calculus, also known as tartar, is hardened plaque that forms on your teeth. It can only be removed by a dental professional during a cleaning.",
        Condition::Caries => "Caries, commonly known as cavities, are permanently damaged areas in the hard surface of your teeth that develop into tiny holes.",
        Condition::Gingivitis => "Gingivitis is a mild form of gum disease that causes irritation, redness, and swelling of your gums around the base of your teeth.",
        Condition::ToothDiscoloration => "Tooth discoloration refers to the staining or darkening of your teeth, which can be caused by foods, drinks, smoking, or aging.",
        Condition::MouthUlcer => "Mouth ulcers are small, painful sores that develop in your mouth or at the base of your gums. They're usually harmless but can be uncomfortable.",
        Condition::Hypodontia => "Hypodontia is a condition where one or more teeth fail to develop. It's one of the most common dental developmental abnormalities.",
    }
}

/// Icon key for the UI layer.
pub fn icon(condition: Condition) -> &'static str {
    match condition {
        Condition::Calculus => "drop.fill",
        Condition::Caries => "exclamationmark.triangle.fill",
        Condition::Gingivitis => "heart.fill",
        Condition::ToothDiscoloration => "sparkles",
        Condition::MouthUlcer => "bandage.fill",
        Condition::Hypodontia => "questionmark.circle.fill",
    }
}

/// Recommended actions. `Medium` and `High` share the elevated list.
pub fn recommendations(condition: Condition, risk: RiskLevel) -> &'static [&'static str] {
    let low = risk == RiskLevel::Low;
    match condition {
        Condition::Calculus if low => &[
            "Schedule regular dental cleanings every 6 months",
            "Use tartar-control toothpaste",
            "Brush twice daily with fluoride toothpaste",
            "Floss daily to remove plaque between teeth",
        ],
        Condition::Calculus => &[
            "Schedule immediate dental cleaning",
            "Use antimicrobial mouthwash daily",
            "Consider electric toothbrush for better plaque removal",
            "Increase brushing frequency to after every meal",
        ],
        Condition::Caries if low => &[
            "Use fluoride toothpaste and mouthwash",
            "Limit sugary and acidic foods",
            "Chew sugar-free gum after meals",
            "Schedule regular dental check-ups",
        ],
        Condition::Caries => &[
            "See dentist immediately for treatment",
            "Avoid hot and cold foods that cause pain",
            "Use fluoride supplements if recommended",
            "Consider dental sealants for protection",
        ],
        Condition::Gingivitis if low => &[
            "Brush gently with soft-bristled toothbrush",
            "Use antibacterial mouthwash",
            "Floss daily to remove plaque",
            "Massage gums gently during brushing",
        ],
        Condition::Gingivitis => &[
            "Schedule professional dental cleaning",
            "Use prescribed antibacterial mouthwash",
            "Consider deep cleaning (scaling and root planing)",
            "Quit smoking if applicable",
        ],
        Condition::ToothDiscoloration if low => &[
            "Use whitening toothpaste (with ADA approval)",
            "Limit coffee, tea, and red wine consumption",
            "Rinse mouth after consuming staining foods",
            "Consider professional whitening consultation",
        ],
        Condition::ToothDiscoloration => &[
            "Consult dentist for professional whitening",
            "Avoid over-the-counter whitening products",
            "Rule out underlying dental issues",
            "Consider porcelain veneers for severe cases",
        ],
        Condition::MouthUlcer if low => &[
            "Rinse with warm salt water",
            "Use over-the-counter pain relievers",
            "Apply topical anesthetics (benzocaine gels)",
            "Avoid spicy, acidic, or rough foods",
        ],
        Condition::MouthUlcer => &[
            "See dentist if ulcers persist over 2 weeks",
            "Use prescription topical corticosteroids",
            "Consider systemic causes (nutritional deficiencies)",
            "Avoid irritating foods completely",
        ],
        Condition::Hypodontia if low => &[
            "Maintain excellent oral hygiene",
            "Use fluoride treatments to strengthen existing teeth",
            "Consider space maintainers if needed",
            "Regular orthodontic evaluations",
        ],
        Condition::Hypodontia => &[
            "Consult orthodontist for treatment planning",
            "Consider dental implants or bridges",
            "Evaluate for prosthetic replacements",
            "Genetic counseling if family history present",
        ],
    }
}

/// Everything the detail view needs for one finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGuidance {
    pub condition: Condition,
    pub risk: RiskLevel,
    pub description: &'static str,
    pub icon: &'static str,
    pub advisory: Advisory,
    pub recommendations: &'static [&'static str],
}

impl ConditionGuidance {
    pub fn for_result(result: &ConditionResult) -> Self {
        let (condition, risk) = (result.name(), result.risk());
        Self {
            condition,
            risk,
            description: description(condition),
            icon: icon(condition),
            advisory: advisory(risk),
            recommendations: recommendations(condition, risk),
        }
    }
}
