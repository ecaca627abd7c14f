//! Clock and calendar for blogmon.
//!
//! All day bucketing happens in a single fixed-offset timezone. The current
//! instant comes from a [`Clock`] so tests can pin "now".

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

use crate::{BlogmonError, Result};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock that always returns `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Fixed-offset calendar used for date keys and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// Calendar for the given whole-hour UTC offset.
    pub fn from_utc_offset_hours(hours: i32) -> Result<Self> {
        FixedOffset::east_opt(hours * 3600)
            .map(|offset| Self { offset })
            .ok_or_else(|| BlogmonError::Config(format!("invalid UTC offset: {hours} hours")))
    }

    /// Korea Standard Time (UTC+9).
    pub fn kst() -> Self {
        Self {
            offset: FixedOffset::east_opt(9 * 3600).expect("UTC+9 is a valid offset"),
        }
    }

    /// Convert an instant to this calendar's local time.
    pub fn localize<Tz: chrono::TimeZone>(&self, dt: &DateTime<Tz>) -> DateTime<FixedOffset> {
        dt.with_timezone(&self.offset)
    }

    /// Calendar date of an instant.
    pub fn date_of<Tz: chrono::TimeZone>(&self, dt: &DateTime<Tz>) -> NaiveDate {
        self.localize(dt).date_naive()
    }

    /// Local "now" from the given clock.
    pub fn now(&self, clock: &dyn Clock) -> DateTime<FixedOffset> {
        self.localize(&clock.now_utc())
    }

    /// Today's date from the given clock.
    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.date_of(&clock.now_utc())
    }

    /// Timestamp shown in check responses (`%Y-%m-%d %H:%M:%S`).
    pub fn format_timestamp<Tz: chrono::TimeZone>(&self, dt: &DateTime<Tz>) -> String {
        self.localize(dt).format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Hours elapsed between `from` and `to`, as a float.
///
/// Negative spans (posts dated in the future) are clamped to zero.
pub fn elapsed_hours<A, B>(from: &DateTime<A>, to: &DateTime<B>) -> f64
where
    A: chrono::TimeZone,
    B: chrono::TimeZone,
{
    let span = to.clone().with_timezone(&Utc) - from.clone().with_timezone(&Utc);
    let hours = span.num_milliseconds() as f64 / 3_600_000.0;
    hours.max(0.0)
}

/// Human relative-time label for an elapsed duration in hours.
///
/// - below one hour: `"{m} minutes ago"`
/// - below one day: `"{h} hours {m} minutes ago"`
/// - otherwise: `"{d} days ago"` (`"1 day ago"` for exactly one day)
pub fn relative_label(elapsed: f64) -> String {
    // Whole minutes; the epsilon absorbs float error from millisecond spans.
    let total_minutes = (elapsed.max(0.0) * 60.0 + 1e-6).floor() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours < 1 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours {minutes} minutes ago")
    } else {
        let days = hours / 24;
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        }
    }
}

/// Round to one decimal place, as shown in `hoursAgo`.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
