//! Daily report text.

use chrono::NaiveDate;
use serde::Serialize;

use crate::alert::message::with_link;

/// Count shown for one feed in the daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Display label.
    pub label: String,
    /// Posts counted for the report date.
    pub count: u32,
}

impl ReportEntry {
    /// Create a new entry.
    pub fn new(label: impl Into<String>, count: u32) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Compose the daily summary message.
///
/// Feeds at or above `daily_goal` are flagged with ⚠️.
pub fn compose_daily_report(
    entries: &[ReportEntry],
    daily_goal: u32,
    date: NaiveDate,
    dashboard_url: &str,
) -> String {
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let marker = if entry.count >= daily_goal { "⚠️" } else { "✅" };
            format!("{} {}: {}", marker, entry.label, entry.count)
        })
        .collect();
    let total: u32 = entries.iter().map(|e| e.count).sum();

    let text = format!(
        "📊 Blog monitor daily report\n{}\n\n{}\n\nTotal posts: {}",
        date.format("%Y-%m-%d"),
        lines.join("\n"),
        total
    );
    with_link(text, dashboard_url)
}
