//! Result types returned by the monitor service.

use chrono::NaiveDate;
use serde::Serialize;

use crate::feed::FeedSnapshot;
use crate::history::HistoryWindow;
use crate::report::ReportEntry;

/// A configured feed as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedInfo {
    /// Display number (env slot or 1-based position).
    pub num: usize,
    /// Blog identifier.
    pub id: String,
    /// Display label.
    pub label: String,
}

/// One feed's entry in a check response.
#[derive(Debug, Clone, Serialize)]
pub struct FeedCheck {
    /// Display number (env slot or 1-based position).
    pub num: usize,
    /// Display label.
    pub label: String,
    /// Current state of the feed.
    #[serde(flatten)]
    pub snapshot: FeedSnapshot,
    /// Daily counts for the last seven days.
    pub history: HistoryWindow,
}

/// Result of checking every feed.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// One entry per configured feed, in configuration order.
    pub results: Vec<FeedCheck>,
    /// Local time of the check (`%Y-%m-%d %H:%M:%S`).
    pub checked_at: String,
    /// Silence threshold in hours.
    pub warn_hours: f64,
}

/// Status of one per-feed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Done.
    Ok,
    /// Not attempted because a dependency is not configured.
    Skip,
    /// Attempted and failed.
    Error,
}

/// Outcome of recording one feed's count.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// Blog identifier.
    pub blog_id: String,
    /// Count written (or that would have been written).
    pub count: u32,
    /// Result status.
    pub status: Status,
    /// Reason for a skip or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of recording today's counts.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    /// Date the counts were written for.
    pub date: NaiveDate,
    /// Store backend name.
    pub store: String,
    /// One entry per configured feed.
    pub results: Vec<RecordOutcome>,
}

/// Status of one alert evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Alert delivered.
    Sent,
    /// Condition holds but an earlier alert covers it.
    Suppressed,
    /// Condition does not hold.
    Clear,
    /// No notifier configured.
    Skip,
    /// Feed could not be read or the send failed.
    Error,
}

/// Outcome of one sub-policy for one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertOutcome {
    /// Result status.
    pub status: AlertStatus,
    /// Suppression, skip or error reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AlertOutcome {
    /// Outcome without a reason.
    pub fn new(status: AlertStatus) -> Self {
        Self {
            status,
            reason: None,
        }
    }

    /// Outcome with a reason.
    pub fn with_reason(status: AlertStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
        }
    }

    /// Whether a notification went out.
    pub fn sent(&self) -> bool {
        self.status == AlertStatus::Sent
    }
}

/// Alert results for one feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedAlerts {
    /// Display number (env slot or 1-based position).
    pub num: usize,
    /// Blog identifier.
    pub blog_id: String,
    /// Display label.
    pub label: String,
    /// Posts published today.
    pub today_count: u32,
    /// Hours since the newest post, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_since_post: Option<f64>,
    /// Silence sub-policy outcome; absent when only goals were evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence: Option<AlertOutcome>,
    /// Goal sub-policy outcome.
    pub goal: AlertOutcome,
}

/// Result of an alert cycle.
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    /// Local time of the cycle.
    pub checked_at: String,
    /// One entry per configured feed.
    pub results: Vec<FeedAlerts>,
    /// Labels of feeds for which at least one alert was sent.
    pub alerts_sent: Vec<String>,
}

/// Result of a daily report run.
#[derive(Debug, Clone, Serialize)]
pub struct DailyReportOutcome {
    /// Date the counts belong to.
    pub date: NaiveDate,
    /// Delivery status.
    pub status: Status,
    /// Skip or error reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Per-feed counts.
    pub entries: Vec<ReportEntry>,
    /// Composed message text, if composed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
