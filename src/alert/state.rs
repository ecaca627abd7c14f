//! Dedup state for alerts.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Per-feed memory of the last alerts sent.
pub trait AlertStateStore: Send {
    /// Instant of the last silence alert for a feed.
    fn silence_last_sent(&self, blog_id: &str) -> Option<DateTime<Utc>>;

    /// Remember that a silence alert was sent at `at`.
    fn record_silence(&mut self, blog_id: &str, at: DateTime<Utc>);

    /// Date on which the last goal alert for a feed was sent.
    fn goal_sent_on(&self, blog_id: &str) -> Option<NaiveDate>;

    /// Remember that a goal alert was sent on `date`.
    fn record_goal(&mut self, blog_id: &str, date: NaiveDate);
}

/// In-process alert state. Starts empty and is lost on restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryAlertState {
    silence_last_sent: HashMap<String, DateTime<Utc>>,
    goal_sent_on: HashMap<String, NaiveDate>,
}

impl MemoryAlertState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertStateStore for MemoryAlertState {
    fn silence_last_sent(&self, blog_id: &str) -> Option<DateTime<Utc>> {
        self.silence_last_sent.get(blog_id).copied()
    }

    fn record_silence(&mut self, blog_id: &str, at: DateTime<Utc>) {
        self.silence_last_sent.insert(blog_id.to_string(), at);
    }

    fn goal_sent_on(&self, blog_id: &str) -> Option<NaiveDate> {
        self.goal_sent_on.get(blog_id).copied()
    }

    fn record_goal(&mut self, blog_id: &str, date: NaiveDate) {
        self.goal_sent_on.insert(blog_id.to_string(), date);
    }
}
