//! Dental Scan Core
//!
//! Turns image-classifier output into risk-annotated scan records and
//! aggregates stored scans into a history view:
//! - Keyword taxonomy over six canonical dental conditions
//! - Per-condition confidence → risk stratification
//! - Deterministic fallback when the model is absent or unsure
//! - Append-only scan storage (in-memory or SQLite)
//! - Calendar-windowed history and health score

pub mod scan;
pub mod classifier;
pub mod orchestrator;
pub mod store;
pub mod history;
pub mod guidance;
pub mod config;

// Re-exports for convenience
pub use scan::{Condition, ConditionResult, RiskLevel, ScanResult};
pub use classifier::{ClassifierError, DentalClassifier};
pub use orchestrator::{ClassificationOrchestrator, ScanError};
pub use store::ScanRecordStore;
pub use history::{HistoryAggregator, TimeWindow};
pub use config::ScanConfig;
