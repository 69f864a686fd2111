//! Orchestration
//!
//! Ties the classifier adapter, the scan domain and the record store into
//! a single scan operation.

pub mod classification;

pub use classification::{ClassificationOrchestrator, ScanError};
