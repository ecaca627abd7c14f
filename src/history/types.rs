//! History types for blogmon.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Number of days in a history window, today included.
pub const HISTORY_DAYS: usize = 7;

/// Persisted post count of one blog on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// Blog identifier.
    pub blog_id: String,
    /// Calendar date in the monitor's timezone.
    pub date: NaiveDate,
    /// Posts published that day.
    pub count: u32,
}

impl DailyCount {
    /// Create a new daily count.
    pub fn new(blog_id: impl Into<String>, date: NaiveDate, count: u32) -> Self {
        Self {
            blog_id: blog_id.into(),
            date,
            count,
        }
    }
}

/// One entry of a history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Posts that day, zero when nothing was recorded.
    pub count: u32,
}

/// Seven consecutive days ending today, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryWindow {
    days: Vec<HistoryDay>,
}

impl HistoryWindow {
    /// All-zero window ending on `today`.
    pub fn zeroed(today: NaiveDate) -> Self {
        let days = (0..HISTORY_DAYS as i64)
            .rev()
            .map(|back| HistoryDay {
                date: today - Duration::days(back),
                count: 0,
            })
            .collect();
        Self { days }
    }

    /// First (oldest) date of the window.
    pub fn start(&self) -> NaiveDate {
        self.days[0].date
    }

    /// Last date of the window (today).
    pub fn end(&self) -> NaiveDate {
        self.days[HISTORY_DAYS - 1].date
    }

    /// Set the count for `date`.
    ///
    /// Returns `false` and changes nothing when `date` is outside the window.
    pub fn set(&mut self, date: NaiveDate, count: u32) -> bool {
        match self.days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.count = count;
                true
            }
            None => false,
        }
    }

    /// Count recorded for `date`, if inside the window.
    pub fn count_on(&self, date: NaiveDate) -> Option<u32> {
        self.days.iter().find(|d| d.date == date).map(|d| d.count)
    }

    /// Entries, oldest first.
    pub fn days(&self) -> &[HistoryDay] {
        &self.days
    }

    /// Sum over the window.
    pub fn total(&self) -> u32 {
        self.days.iter().map(|d| d.count).sum()
    }
}
