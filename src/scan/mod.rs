//! Scan Domain
//!
//! Condition catalog, risk stratification, result mapping and the
//! fallback policy that together turn classifier output into a record.

pub mod taxonomy;
pub mod risk;
pub mod model;
pub mod mapper;
pub mod fallback;

pub use taxonomy::{Condition, ConditionTaxonomy};
pub use risk::{RiskBands, RiskLevel, RiskTable};
pub use model::{ConditionResult, RiskBreakdown, ScanResult};
pub use mapper::{ConditionMapper, RawObservation};
pub use fallback::FallbackPolicy;
