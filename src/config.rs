//! Runtime configuration
//!
//! Read from the process environment (after `.env` is loaded by the binary).

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Offset, Utc, Weekday};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::history::{HistoryAggregator, DEFAULT_HEALTH_WINDOW};

pub const ENV_DB_PATH: &str = "DENTAL_SCAN_DB_PATH";
pub const ENV_CLASSIFIER_URL: &str = "DENTAL_SCAN_CLASSIFIER_URL";
pub const ENV_CLASSIFIER_TIMEOUT: &str = "DENTAL_SCAN_CLASSIFIER_TIMEOUT_SECS";
pub const ENV_UTC_OFFSET: &str = "DENTAL_SCAN_UTC_OFFSET_MINUTES";
pub const ENV_WEEK_START: &str = "DENTAL_SCAN_WEEK_START";
pub const ENV_HEALTH_WINDOW: &str = "DENTAL_SCAN_HEALTH_WINDOW";

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// SQLite file holding scan records
    pub db_path: PathBuf,
    /// Inference endpoint; `None` means no model is available
    pub classifier_url: Option<String>,
    pub classifier_timeout: Duration,
    /// Offset used for calendar week/month boundaries
    pub utc_offset: FixedOffset,
    pub week_start: Weekday,
    /// Scans considered by the health score
    pub health_window: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("dental_scans.db"),
            classifier_url: None,
            classifier_timeout: Duration::from_secs(30),
            utc_offset: Utc.fix(),
            week_start: Weekday::Sun,
            health_window: DEFAULT_HEALTH_WINDOW,
        }
    }
}

impl ScanConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        config.classifier_url = get(ENV_CLASSIFIER_URL);

        if let Some(secs) = get(ENV_CLASSIFIER_TIMEOUT) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("{ENV_CLASSIFIER_TIMEOUT} must be whole seconds, got '{secs}'"))?;
            config.classifier_timeout = Duration::from_secs(secs);
        }

        if let Some(minutes) = get(ENV_UTC_OFFSET) {
            let minutes: i32 = minutes
                .parse()
                .with_context(|| format!("{ENV_UTC_OFFSET} must be an integer, got '{minutes}'"))?;
            config.utc_offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .with_context(|| format!("{ENV_UTC_OFFSET} out of range: {minutes}"))?;
        }

        if let Some(day) = get(ENV_WEEK_START) {
            config.week_start = match day.to_lowercase().as_str() {
                "sunday" | "sun" => Weekday::Sun,
                "monday" | "mon" => Weekday::Mon,
                other => bail!("{ENV_WEEK_START} must be 'sunday' or 'monday', got '{other}'"),
            };
        }

        if let Some(n) = get(ENV_HEALTH_WINDOW) {
            let n: usize = n
                .parse()
                .with_context(|| format!("{ENV_HEALTH_WINDOW} must be a positive integer, got '{n}'"))?;
            if n == 0 {
                bail!("{ENV_HEALTH_WINDOW} must be at least 1");
            }
            config.health_window = n;
        }

        Ok(config)
    }

    pub fn aggregator(&self) -> HistoryAggregator {
        HistoryAggregator::new()
            .with_offset(self.utc_offset)
            .with_week_start(self.week_start)
            .with_health_window(self.health_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScanConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("dental_scans.db"));
        assert!(config.classifier_url.is_none());
        assert_eq!(config.classifier_timeout, Duration::from_secs(30));
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.week_start, Weekday::Sun);
        assert_eq!(config.health_window, 5);
    }

    #[test]
    fn test_overrides() {
        let config = ScanConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/scans.db"),
            (ENV_CLASSIFIER_URL, "http://localhost:8080/classify"),
            (ENV_CLASSIFIER_TIMEOUT, "5"),
            (ENV_UTC_OFFSET, "-300"),
            (ENV_WEEK_START, "Monday"),
            (ENV_HEALTH_WINDOW, "10"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/scans.db"));
        assert_eq!(config.classifier_url.as_deref(), Some("http://localhost:8080/classify"));
        assert_eq!(config.classifier_timeout, Duration::from_secs(5));
        assert_eq!(config.utc_offset.local_minus_utc(), -300 * 60);
        assert_eq!(config.week_start, Weekday::Mon);
        assert_eq!(config.health_window, 10);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ScanConfig::from_lookup(lookup(&[(ENV_WEEK_START, "friday")])).is_err());
        assert!(ScanConfig::from_lookup(lookup(&[(ENV_HEALTH_WINDOW, "0")])).is_err());
        assert!(ScanConfig::from_lookup(lookup(&[(ENV_UTC_OFFSET, "99999")])).is_err());
        assert!(ScanConfig::from_lookup(lookup(&[(ENV_UTC_OFFSET, "40000000")])).is_err());
        assert!(ScanConfig::from_lookup(lookup(&[(ENV_UTC_OFFSET, "-40000000")])).is_err());
        assert!(ScanConfig::from_lookup(lookup(&[(ENV_CLASSIFIER_TIMEOUT, "soon")])).is_err());
    }

    #[test]
    fn test_blank_url_means_no_model() {
        let config = ScanConfig::from_lookup(lookup(&[(ENV_CLASSIFIER_URL, "  ")])).unwrap();
        assert!(config.classifier_url.is_none());
    }
}
