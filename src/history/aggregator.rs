//! Read-side history computations
//!
//! Everything here is a pure function of a store snapshot and a "now"
//! timestamp. Nothing is cached; callers re-run queries after each write.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::window::TimeWindow;
use crate::scan::{ConditionResult, RiskLevel, ScanResult};

/// Number of most recent scans the health score looks at.
pub const DEFAULT_HEALTH_WINDOW: usize = 5;

/// Share of low-risk findings across recent scans, or nothing to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthScore {
    NotAvailable,
    Score(u8),
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthScore::NotAvailable => f.write_str("N/A"),
            HealthScore::Score(v) => write!(f, "{v}"),
        }
    }
}

/// One line of the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub condition_count: usize,
    pub highest_risk: Option<RiskLevel>,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub window: TimeWindow,
    pub rows: Vec<HistoryRow>,
    pub monthly_count: usize,
    pub health_score: HealthScore,
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryAggregator {
    offset: FixedOffset,
    week_start: Weekday,
    health_window: usize,
}

impl Default for HistoryAggregator {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            week_start: Weekday::Sun,
            health_window: DEFAULT_HEALTH_WINDOW,
        }
    }
}

impl HistoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar math happens in this offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_health_window(mut self, scans: usize) -> Self {
        self.health_window = scans;
        self
    }

    fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let days_back = (date.weekday().num_days_from_sunday() + 7
            - self.week_start.num_days_from_sunday())
            % 7;
        date - Duration::days(days_back as i64)
    }

    /// Whether `timestamp` falls inside `window` relative to `now`.
    pub fn in_window(&self, window: TimeWindow, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let ts = timestamp.with_timezone(&self.offset);
        let now = now.with_timezone(&self.offset);

        match window {
            TimeWindow::All => true,
            TimeWindow::ThisWeek => {
                let start = self.start_of_week(now.date_naive());
                let date = ts.date_naive();
                date >= start && date < start + Duration::days(7)
            }
            TimeWindow::ThisMonth => ts.year() == now.year() && ts.month() == now.month(),
            TimeWindow::Last3Months => match now.checked_sub_months(Months::new(3)) {
                Some(cutoff) => ts >= cutoff,
                None => true,
            },
        }
    }

    /// Scans inside `window`, in snapshot order.
    pub fn filter<'a>(&self, scans: &'a [ScanResult], window: TimeWindow, now: DateTime<Utc>) -> Vec<&'a ScanResult> {
        scans
            .iter()
            .filter(|s| self.in_window(window, s.timestamp(), now))
            .collect()
    }

    /// Scans recorded in the current calendar month.
    pub fn monthly_count(&self, scans: &[ScanResult], now: DateTime<Utc>) -> usize {
        scans
            .iter()
            .filter(|s| self.in_window(TimeWindow::ThisMonth, s.timestamp(), now))
            .count()
    }

    /// `round(100 * low / total)` over the most recent scans' conditions.
    pub fn health_score(&self, scans: &[ScanResult]) -> HealthScore {
        if scans.is_empty() {
            return HealthScore::NotAvailable;
        }

        let mut recent: Vec<&ScanResult> = scans.iter().collect();
        recent.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        let (low, total) = recent
            .into_iter()
            .take(self.health_window)
            .flat_map(|s| s.conditions())
            .fold((0usize, 0usize), |(low, total), c| {
                (low + usize::from(c.risk() == RiskLevel::Low), total + 1)
            });

        if total == 0 {
            return HealthScore::Score(0);
        }
        HealthScore::Score((100.0 * low as f64 / total as f64).round() as u8)
    }

    pub fn summarize(&self, scans: &[ScanResult], window: TimeWindow, now: DateTime<Utc>) -> HistorySummary {
        let rows = self
            .filter(scans, window, now)
            .into_iter()
            .map(|s| HistoryRow {
                id: s.id(),
                timestamp: s.timestamp(),
                condition_count: s.conditions().len(),
                highest_risk: highest_risk(s).map(|c| c.risk()),
                has_image: s.image_bytes().is_some(),
            })
            .collect();

        HistorySummary {
            window,
            rows,
            monthly_count: self.monthly_count(scans, now),
            health_score: self.health_score(scans),
        }
    }
}

/// The condition shown as a scan's headline risk in the history list.
///
/// Compares risk display labels as strings, so the order is
/// `"Monitor" < "Safe" < "See Dentist"`: a Low finding outranks a Medium
/// one. The first of equally-labelled conditions wins.
pub fn highest_risk(scan: &ScanResult) -> Option<&ConditionResult> {
    scan.conditions().iter().fold(None, |best, c| match best {
        Some(b) if c.risk().label() <= b.risk().label() => Some(b),
        _ => Some(c),
    })
}

/// Most severe condition by risk ordinal. First occurrence wins ties.
pub fn most_severe(scan: &ScanResult) -> Option<&ConditionResult> {
    scan.conditions().iter().fold(None, |best, c| match best {
        Some(b) if c.risk() <= b.risk() => Some(b),
        _ => Some(c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{Condition, FallbackPolicy};
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn scan(ts: DateTime<Utc>, risks: &[RiskLevel]) -> ScanResult {
        let conditions = risks
            .iter()
            .zip(Condition::ALL.iter().cycle())
            .map(|(r, c)| ConditionResult::new(*c, *r, 0.5))
            .collect();
        ScanResult::at(ts, conditions, None)
    }

    #[test]
    fn test_week_crosses_month_boundary() {
        // 2025-03-01 is a Saturday; the Sunday-start week began 2025-02-23.
        let agg = HistoryAggregator::new();
        let now = utc(2025, 3, 1, 12);
        let feb = utc(2025, 2, 25, 9);
        assert!(agg.in_window(TimeWindow::ThisWeek, feb, now));
        assert!(!agg.in_window(TimeWindow::ThisMonth, feb, now));
        assert!(!agg.in_window(TimeWindow::ThisWeek, utc(2025, 2, 22, 23), now));
    }

    #[test]
    fn test_week_start_is_configurable() {
        // 2025-03-02 is a Sunday.
        let now = utc(2025, 3, 2, 12);
        let friday = utc(2025, 2, 28, 12);
        assert!(!HistoryAggregator::new().in_window(TimeWindow::ThisWeek, friday, now));
        assert!(HistoryAggregator::new()
            .with_week_start(Weekday::Mon)
            .in_window(TimeWindow::ThisWeek, friday, now));
    }

    #[test]
    fn test_offset_shifts_month() {
        let now = utc(2025, 3, 31, 23);
        let ts = utc(2025, 3, 31, 10);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert!(HistoryAggregator::new().in_window(TimeWindow::ThisMonth, ts, now));
        assert!(!HistoryAggregator::new()
            .with_offset(plus_two)
            .in_window(TimeWindow::ThisMonth, ts, now));
    }

    #[test]
    fn test_month_is_bound_to_year() {
        let agg = HistoryAggregator::new();
        let now = utc(2025, 12, 10, 12);
        assert!(agg.in_window(TimeWindow::ThisMonth, utc(2025, 12, 1, 0), now));
        assert!(!agg.in_window(TimeWindow::ThisMonth, utc(2024, 12, 10, 12), now));

        let scans = vec![
            scan(utc(2025, 12, 2, 8), &[RiskLevel::Low]),
            scan(utc(2024, 12, 2, 8), &[RiskLevel::Low]),
            scan(utc(2024, 12, 31, 23), &[RiskLevel::Low]),
        ];
        assert_eq!(agg.monthly_count(&scans, now), 1);

        // 2026-01-01 is a Thursday; its week began Sunday 2025-12-28.
        let new_year = utc(2026, 1, 1, 9);
        let dec_29 = utc(2025, 12, 29, 9);
        assert!(agg.in_window(TimeWindow::ThisWeek, dec_29, new_year));
        assert!(!agg.in_window(TimeWindow::ThisMonth, dec_29, new_year));
    }

    #[test]
    fn test_last_three_months_clamps_month_end() {
        let agg = HistoryAggregator::new();
        let now = utc(2025, 5, 31, 12);
        assert!(agg.in_window(TimeWindow::Last3Months, utc(2025, 2, 28, 12), now));
        assert!(!agg.in_window(TimeWindow::Last3Months, utc(2025, 2, 27, 12), now));
    }

    #[test]
    fn test_highest_risk_uses_label_order() {
        let ts = utc(2025, 1, 1, 0);
        let low_high = scan(ts, &[RiskLevel::Low, RiskLevel::High]);
        assert_eq!(highest_risk(&low_high).map(|c| c.risk().label()), Some("See Dentist"));

        // "Safe" sorts after "Monitor", so Low wins over Medium.
        let low_medium = scan(ts, &[RiskLevel::Medium, RiskLevel::Low]);
        let picked = highest_risk(&low_medium).unwrap();
        assert_eq!(picked.risk(), RiskLevel::Low);
        assert_eq!(most_severe(&low_medium).unwrap().risk(), RiskLevel::Medium);
    }

    #[test]
    fn test_highest_risk_first_of_ties() {
        let s = scan(utc(2025, 1, 1, 0), &[RiskLevel::High, RiskLevel::High]);
        assert_eq!(highest_risk(&s).unwrap().id(), s.conditions()[0].id());
        assert!(highest_risk(&ScanResult::at(utc(2025, 1, 1, 0), Vec::new(), None)).is_none());
    }

    #[test]
    fn test_health_score() {
        let agg = HistoryAggregator::new();
        assert_eq!(agg.health_score(&[]), HealthScore::NotAvailable);

        let empty = ScanResult::at(utc(2025, 1, 1, 0), Vec::new(), None);
        assert_eq!(agg.health_score(&[empty]), HealthScore::Score(0));

        let s = scan(utc(2025, 1, 1, 0), &[RiskLevel::Low, RiskLevel::High, RiskLevel::Low]);
        assert_eq!(agg.health_score(&[s]), HealthScore::Score(67));
    }

    #[test]
    fn test_health_score_uses_five_most_recent() {
        let agg = HistoryAggregator::new();
        let mut scans: Vec<ScanResult> = (1..=5)
            .map(|d| scan(utc(2025, 1, 10 + d, 0), &[RiskLevel::Low]))
            .collect();
        // Oldest scan is all high risk and falls outside the window.
        scans.push(scan(utc(2025, 1, 1, 0), &[RiskLevel::High, RiskLevel::High]));
        assert_eq!(agg.health_score(&scans), HealthScore::Score(100));
        assert_eq!(agg.with_health_window(6).health_score(&scans), HealthScore::Score(71));
    }

    #[test]
    fn test_summary() {
        let agg = HistoryAggregator::new();
        let now = utc(2025, 3, 20, 12);
        let scans = vec![
            ScanResult::at(utc(2025, 3, 19, 8), FallbackPolicy::new().default_set(), Some(vec![1])),
            scan(utc(2025, 2, 1, 8), &[RiskLevel::Medium]),
        ];
        let summary = agg.summarize(&scans, TimeWindow::ThisMonth, now);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].condition_count, 6);
        assert_eq!(summary.rows[0].highest_risk, Some(RiskLevel::Low));
        assert!(summary.rows[0].has_image);
        assert_eq!(summary.monthly_count, 1);
        assert_eq!(summary.health_score, HealthScore::Score(86));
        assert_eq!(summary.health_score.to_string(), "86");
    }
}
