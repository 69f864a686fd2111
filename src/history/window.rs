//! Calendar time windows for the history view

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    All,
    /// Same calendar week as "now".
    ThisWeek,
    /// Same calendar month as "now".
    ThisMonth,
    /// On or after "now" minus three calendar months.
    Last3Months,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::All,
        TimeWindow::ThisWeek,
        TimeWindow::ThisMonth,
        TimeWindow::Last3Months,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::All => "All",
            TimeWindow::ThisWeek => "This Week",
            TimeWindow::ThisMonth => "This Month",
            TimeWindow::Last3Months => "Last 3 Months",
        }
    }

    /// Short name accepted by `FromStr`.
    pub fn keyword(&self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::ThisWeek => "week",
            TimeWindow::ThisMonth => "month",
            TimeWindow::Last3Months => "3months",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(TimeWindow::All),
            "week" | "this_week" | "thisweek" => Ok(TimeWindow::ThisWeek),
            "month" | "this_month" | "thismonth" => Ok(TimeWindow::ThisMonth),
            "3months" | "last_3_months" | "last3months" | "quarter" => Ok(TimeWindow::Last3Months),
            other => Err(format!("unknown time window '{other}'")),
        }
    }
}
