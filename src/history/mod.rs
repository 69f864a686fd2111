//! Scan History
//!
//! Time-window filtering and aggregate statistics over stored scans.

pub mod window;
pub mod aggregator;

pub use window::TimeWindow;
pub use aggregator::{
    highest_risk, most_severe, HealthScore, HistoryAggregator, HistoryRow, HistorySummary,
    DEFAULT_HEALTH_WINDOW,
};
