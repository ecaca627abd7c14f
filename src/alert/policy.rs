//! Silence and goal alert policies.
//!
//! Both policies decide under the caller's lock on the [`AlertStateStore`]
//! and record the send before it is attempted. A failed send is not rolled
//! back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::alert::state::AlertStateStore;
use crate::datetime::elapsed_hours;
use crate::feed::FeedSnapshot;

/// Outcome of a policy evaluation for one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AlertDecision {
    /// Send the alert now. State has already been updated.
    Fire,
    /// Condition holds but an earlier alert covers it.
    Suppressed(String),
    /// Condition does not hold.
    NotTriggered,
}

impl AlertDecision {
    /// Whether the alert should be sent.
    pub fn should_send(&self) -> bool {
        matches!(self, AlertDecision::Fire)
    }
}

/// "Feed has gone quiet" policy.
#[derive(Debug, Clone, Copy)]
pub struct SilencePolicy {
    warn_hours: f64,
    interval_hours: f64,
}

impl SilencePolicy {
    /// Create a new policy.
    pub fn new(warn_hours: f64, interval_hours: f64) -> Self {
        Self {
            warn_hours,
            interval_hours,
        }
    }

    /// Hours without a post before the feed counts as silent.
    pub fn warn_hours(&self) -> f64 {
        self.warn_hours
    }

    /// Minimum hours between two alerts for one feed.
    pub fn interval_hours(&self) -> f64 {
        self.interval_hours
    }

    /// Whether a snapshot shows a silent feed.
    ///
    /// Failed snapshots are never silent; an ok snapshot without dated posts is.
    pub fn is_silent(&self, snapshot: &FeedSnapshot) -> bool {
        if !snapshot.ok {
            return false;
        }
        match snapshot.newest_elapsed_hours() {
            Some(hours) => hours > self.warn_hours,
            None => true,
        }
    }

    /// Decide whether to send a silence alert, recording it if so.
    pub fn decide(
        &self,
        state: &mut dyn AlertStateStore,
        blog_id: &str,
        condition: bool,
        now: DateTime<Utc>,
    ) -> AlertDecision {
        if !condition {
            return AlertDecision::NotTriggered;
        }

        if let Some(last) = state.silence_last_sent(blog_id) {
            if elapsed_hours(&last, &now) < self.interval_hours {
                debug!("Silence alert for {} suppressed (last sent {})", blog_id, last);
                return AlertDecision::Suppressed(format!(
                    "already sent within {} hours",
                    self.interval_hours
                ));
            }
        }

        state.record_silence(blog_id, now);
        AlertDecision::Fire
    }
}

/// "Too many posts today" policy.
#[derive(Debug, Clone, Copy)]
pub struct GoalPolicy {
    daily_goal: u32,
}

impl GoalPolicy {
    /// Create a new policy.
    pub fn new(daily_goal: u32) -> Self {
        Self { daily_goal }
    }

    /// Same-day count that triggers the alert.
    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// Decide whether to send a goal alert, recording it if so.
    pub fn decide(
        &self,
        state: &mut dyn AlertStateStore,
        blog_id: &str,
        today_count: u32,
        today: NaiveDate,
    ) -> AlertDecision {
        if today_count < self.daily_goal {
            return AlertDecision::NotTriggered;
        }

        if state.goal_sent_on(blog_id) == Some(today) {
            debug!("Goal alert for {} suppressed (already sent {})", blog_id, today);
            return AlertDecision::Suppressed("already sent today".to_string());
        }

        state.record_goal(blog_id, today);
        AlertDecision::Fire
    }
}
