//! Monitor service for blogmon.
//!
//! Runs the trigger operations over every configured feed: checking,
//! recording daily counts, evaluating alerts and sending the daily report.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::alert::{
    format_hours, goal_message, silence_message, AlertDecision, AlertStateStore, GoalPolicy,
    MemoryAlertState, SilencePolicy,
};
use crate::config::{Config, FeedConfig};
use crate::datetime::{round_tenth, Calendar, Clock, SystemClock};
use crate::feed::{FeedEvaluator, FeedSnapshot, FeedSource, MAX_ERROR_LENGTH};
use crate::history::{DailyCount, DailyCountStore, HistoryAggregator};
use crate::monitor::types::{
    AlertOutcome, AlertReport, AlertStatus, CheckReport, DailyReportOutcome, FeedAlerts,
    FeedCheck, FeedInfo, RecordOutcome, RecordReport, Status,
};
use crate::notify::Notifier;
use crate::report::{compose_daily_report, ReportEntry};
use crate::Result;

/// Reason reported when no notifier is configured.
pub const NO_NOTIFIER: &str = "notifier not configured";

/// Reason reported when no store is configured.
pub const NO_STORE: &str = "store not configured";

/// Which sub-policies an alert cycle runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertScope {
    /// Silence and goal.
    All,
    /// Goal only.
    GoalOnly,
}

/// Service for monitoring operations.
pub struct MonitorService {
    feeds: Vec<FeedConfig>,
    calendar: Calendar,
    evaluator: FeedEvaluator,
    silence: SilencePolicy,
    goal: GoalPolicy,
    dashboard_url: String,
    clock: Arc<dyn Clock>,
    source: Arc<dyn FeedSource>,
    store: Arc<dyn DailyCountStore>,
    history: HistoryAggregator,
    notifier: Option<Arc<dyn Notifier>>,
    state: Mutex<Box<dyn AlertStateStore>>,
}

impl MonitorService {
    /// Create a new service from configuration.
    ///
    /// Uses the system clock, an empty in-memory alert state and no notifier.
    pub fn new(
        config: &Config,
        source: Arc<dyn FeedSource>,
        store: Arc<dyn DailyCountStore>,
    ) -> Result<Self> {
        let m = &config.monitor;
        let calendar = Calendar::from_utc_offset_hours(m.utc_offset_hours)?;

        Ok(Self {
            feeds: config.feeds.clone(),
            calendar,
            evaluator: FeedEvaluator::new(calendar).with_max_posts(m.max_posts),
            silence: SilencePolicy::new(m.warn_hours, m.alert_interval_hours),
            goal: GoalPolicy::new(m.daily_goal),
            dashboard_url: m.dashboard_url.clone(),
            clock: Arc::new(SystemClock),
            source,
            history: HistoryAggregator::new(store.clone()),
            store,
            notifier: None,
            state: Mutex::new(Box::new(MemoryAlertState::new())),
        })
    }

    /// Deliver alerts and reports through `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Read the current time from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the alert dedup state.
    pub fn with_alert_state(mut self, state: Box<dyn AlertStateStore>) -> Self {
        self.state = Mutex::new(state);
        self
    }

    /// Configured feeds with their display numbers.
    pub fn feeds(&self) -> Vec<FeedInfo> {
        self.feeds
            .iter()
            .enumerate()
            .map(|(i, feed)| FeedInfo {
                num: feed.display_num(i),
                id: feed.id.clone(),
                label: feed.display_label().to_string(),
            })
            .collect()
    }

    /// Current local time.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.calendar.now(self.clock.as_ref())
    }

    /// Today's date in the monitor's timezone.
    pub fn today(&self) -> NaiveDate {
        self.calendar.today(self.clock.as_ref())
    }

    /// Whether a notifier is configured.
    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    async fn snapshot(&self, feed: &FeedConfig, now: DateTime<Utc>) -> FeedSnapshot {
        let fetched = self.source.fetch(&feed.id).await;
        if let Err(e) = &fetched {
            warn!("Failed to fetch feed {}: {}", feed.id, e);
        }
        self.evaluator.evaluate(&feed.id, fetched, now)
    }

    /// Snapshot and history of every configured feed.
    pub async fn check_all(&self) -> CheckReport {
        let now = self.clock.now_utc();
        let today = self.calendar.date_of(&now);
        debug!("Checking {} feed(s)", self.feeds.len());

        let mut results = Vec::with_capacity(self.feeds.len());
        for (i, feed) in self.feeds.iter().enumerate() {
            let snapshot = self.snapshot(feed, now).await;
            let history = self.history.window(&feed.id, today).await;
            results.push(FeedCheck {
                num: feed.display_num(i),
                label: feed.display_label().to_string(),
                snapshot,
                history,
            });
        }

        CheckReport {
            results,
            checked_at: self.calendar.format_timestamp(&now),
            warn_hours: self.silence.warn_hours(),
        }
    }

    /// Write today's count of every feed to the store.
    ///
    /// Feeds that cannot be read are not written.
    pub async fn record_today(&self) -> RecordReport {
        let now = self.clock.now_utc();
        let today = self.calendar.date_of(&now);

        let mut results = Vec::with_capacity(self.feeds.len());
        for feed in &self.feeds {
            let snapshot = self.snapshot(feed, now).await;
            let outcome = if !snapshot.ok {
                RecordOutcome {
                    blog_id: feed.id.clone(),
                    count: 0,
                    status: Status::Error,
                    reason: snapshot.error,
                }
            } else if !self.store.is_enabled() {
                RecordOutcome {
                    blog_id: feed.id.clone(),
                    count: snapshot.today_count,
                    status: Status::Skip,
                    reason: Some(NO_STORE.to_string()),
                }
            } else {
                let row = DailyCount::new(&feed.id, today, snapshot.today_count);
                match self.store.upsert(&row).await {
                    Ok(()) => {
                        debug!("Recorded {} post(s) for {} on {}", row.count, feed.id, today);
                        RecordOutcome {
                            blog_id: feed.id.clone(),
                            count: row.count,
                            status: Status::Ok,
                            reason: None,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to record count for {}: {}", feed.id, e);
                        RecordOutcome {
                            blog_id: feed.id.clone(),
                            count: row.count,
                            status: Status::Error,
                            reason: Some(e.short_reason(MAX_ERROR_LENGTH)),
                        }
                    }
                }
            };
            results.push(outcome);
        }

        RecordReport {
            date: today,
            store: self.store.backend_name().to_string(),
            results,
        }
    }

    /// Run the silence and goal policies over every feed.
    pub async fn evaluate_alerts(&self) -> AlertReport {
        self.run_alerts(AlertScope::All).await
    }

    /// Run only the goal policy over every feed.
    pub async fn check_goals(&self) -> AlertReport {
        self.run_alerts(AlertScope::GoalOnly).await
    }

    async fn run_alerts(&self, scope: AlertScope) -> AlertReport {
        let now = self.clock.now_utc();
        let today = self.calendar.date_of(&now);

        let mut results = Vec::with_capacity(self.feeds.len());
        let mut alerts_sent = Vec::new();

        for (i, feed) in self.feeds.iter().enumerate() {
            let label = feed.display_label().to_string();
            let snapshot = self.snapshot(feed, now).await;
            let hours = snapshot.newest_elapsed_hours();

            let (silence, goal) = if !snapshot.ok {
                let reason = snapshot.error.clone().unwrap_or_default();
                let silence = (scope == AlertScope::All)
                    .then(|| AlertOutcome::with_reason(AlertStatus::Error, reason.clone()));
                (silence, AlertOutcome::with_reason(AlertStatus::Error, reason))
            } else if self.notifier.is_none() {
                let silence = (scope == AlertScope::All)
                    .then(|| AlertOutcome::with_reason(AlertStatus::Skip, NO_NOTIFIER));
                (silence, AlertOutcome::with_reason(AlertStatus::Skip, NO_NOTIFIER))
            } else {
                let (silence_decision, goal_decision) = {
                    let mut state = self.state.lock().await;
                    let silence_decision = (scope == AlertScope::All).then(|| {
                        let silent = self.silence.is_silent(&snapshot);
                        self.silence.decide(&mut **state, &feed.id, silent, now)
                    });
                    let goal_decision =
                        self.goal.decide(&mut **state, &feed.id, snapshot.today_count, today);
                    (silence_decision, goal_decision)
                };

                let silence = match silence_decision {
                    Some(decision) => {
                        let hours_text = format_hours(hours);
                        let text = silence_message(&label, &hours_text, &self.dashboard_url);
                        Some(self.deliver(&feed.id, decision, &text).await)
                    }
                    None => None,
                };
                let text = goal_message(&label, snapshot.today_count, &self.dashboard_url);
                let goal = self.deliver(&feed.id, goal_decision, &text).await;
                (silence, goal)
            };

            if goal.sent() || silence.as_ref().is_some_and(AlertOutcome::sent) {
                alerts_sent.push(label.clone());
            }

            results.push(FeedAlerts {
                num: feed.display_num(i),
                blog_id: feed.id.clone(),
                label,
                today_count: snapshot.today_count,
                hours_since_post: hours.map(round_tenth),
                silence,
                goal,
            });
        }

        AlertReport {
            checked_at: self.calendar.format_timestamp(&now),
            results,
            alerts_sent,
        }
    }

    /// Send a silence alert with caller-supplied hours and label.
    ///
    /// Shares the silence dedup state with [`Self::evaluate_alerts`].
    /// An empty label falls back to the configured label, then the id.
    pub async fn send_silence_alert(
        &self,
        blog_id: &str,
        hours: &str,
        label: &str,
    ) -> AlertOutcome {
        if self.notifier.is_none() {
            return AlertOutcome::with_reason(AlertStatus::Skip, NO_NOTIFIER);
        }

        let label = if label.trim().is_empty() {
            self.feeds
                .iter()
                .find(|f| f.id == blog_id)
                .map(|f| f.display_label().to_string())
                .unwrap_or_else(|| blog_id.to_string())
        } else {
            label.to_string()
        };

        let now = self.clock.now_utc();
        let decision = {
            let mut state = self.state.lock().await;
            self.silence.decide(&mut **state, blog_id, true, now)
        };

        let text = silence_message(&label, hours, &self.dashboard_url);
        self.deliver(blog_id, decision, &text).await
    }

    async fn deliver(&self, blog_id: &str, decision: AlertDecision, text: &str) -> AlertOutcome {
        match decision {
            AlertDecision::NotTriggered => AlertOutcome::new(AlertStatus::Clear),
            AlertDecision::Suppressed(reason) => {
                AlertOutcome::with_reason(AlertStatus::Suppressed, reason)
            }
            AlertDecision::Fire => {
                let Some(notifier) = &self.notifier else {
                    return AlertOutcome::with_reason(AlertStatus::Skip, NO_NOTIFIER);
                };
                match notifier.send(text).await {
                    Ok(()) => {
                        info!("Alert sent for {} via {}", blog_id, notifier.channel_name());
                        AlertOutcome::new(AlertStatus::Sent)
                    }
                    Err(e) => {
                        warn!("Failed to send alert for {}: {}", blog_id, e);
                        AlertOutcome::with_reason(
                            AlertStatus::Error,
                            e.short_reason(MAX_ERROR_LENGTH),
                        )
                    }
                }
            }
        }
    }

    /// Compose today's report from live counts and send it.
    pub async fn send_daily_report(&self) -> DailyReportOutcome {
        let now = self.clock.now_utc();
        let date = self.calendar.date_of(&now);

        let Some(notifier) = &self.notifier else {
            return DailyReportOutcome {
                date,
                status: Status::Skip,
                reason: Some(NO_NOTIFIER.to_string()),
                entries: Vec::new(),
                message: None,
            };
        };

        let mut entries = Vec::with_capacity(self.feeds.len());
        for feed in &self.feeds {
            let snapshot = self.snapshot(feed, now).await;
            entries.push(ReportEntry::new(feed.display_label(), snapshot.today_count));
        }

        let message = compose_daily_report(
            &entries,
            self.goal.daily_goal(),
            date,
            &self.dashboard_url,
        );

        let (status, reason) = match notifier.send(&message).await {
            Ok(()) => {
                info!("Daily report for {} sent", date);
                (Status::Ok, None)
            }
            Err(e) => {
                warn!("Failed to send daily report: {}", e);
                (Status::Error, Some(e.short_reason(MAX_ERROR_LENGTH)))
            }
        };

        DailyReportOutcome {
            date,
            status,
            reason,
            entries,
            message: Some(message),
        }
    }
}

impl std::fmt::Debug for MonitorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorService")
            .field("feeds", &self.feeds)
            .field("store", &self.store.backend_name())
            .field("notifier", &self.notifier.as_ref().map(|n| n.channel_name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::FixedClock;
    use crate::feed::RawPost;
    use crate::history::DisabledStore;
    use crate::BlogmonError;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    /// Serves posts from a map; unknown ids fail with a transport error.
    #[derive(Default)]
    struct FakeSource {
        posts: StdMutex<HashMap<String, Vec<RawPost>>>,
    }

    impl FakeSource {
        fn set(&self, id: &str, posts: Vec<RawPost>) {
            self.posts.lock().unwrap().insert(id.to_string(), posts);
        }
    }

    #[async_trait]
    impl FeedSource for FakeSource {
        async fn fetch(&self, feed_id: &str) -> Result<Vec<RawPost>> {
            self.posts
                .lock()
                .unwrap()
                .get(feed_id)
                .cloned()
                .ok_or_else(|| BlogmonError::Transport("connection refused".into()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: StdMutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn channel_name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(BlogmonError::Notify("HTTP 401: unauthorized".into()));
            }
            Ok(())
        }
    }

    fn start() -> DateTime<Utc> {
        // 2024-01-15 21:00 KST
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.feeds = vec![FeedConfig::new("alpha", "Alpha"), FeedConfig::new("beta", "")];
        config
    }

    fn posts_ago(hours: &[i64]) -> Vec<RawPost> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| {
                RawPost::new(
                    format!("post {i}"),
                    Some(start() - Duration::hours(*h)),
                    format!("https://blog.example.com/{i}"),
                )
            })
            .collect()
    }

    struct Harness {
        service: MonitorService,
        source: Arc<FakeSource>,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<FixedClock>,
    }

    fn harness_with(store: Arc<dyn DailyCountStore>, notifier: RecordingNotifier) -> Harness {
        let source = Arc::new(FakeSource::default());
        let notifier = Arc::new(notifier);
        let clock = Arc::new(FixedClock::new(start()));
        let service = MonitorService::new(&config(), source.clone(), store)
            .unwrap()
            .with_notifier(notifier.clone())
            .with_clock(clock.clone());
        Harness {
            service,
            source,
            notifier,
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(DisabledStore), RecordingNotifier::default())
    }

    #[tokio::test]
    async fn test_feeds_numbering_and_labels() {
        let h = harness();
        let feeds = h.service.feeds();
        assert_eq!(feeds[0].num, 1);
        assert_eq!(feeds[0].label, "Alpha");
        assert_eq!(feeds[1].num, 2);
        assert_eq!(feeds[1].label, "beta");
    }

    #[tokio::test]
    async fn test_check_all_one_entry_per_feed() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[1, 2]));

        let report = h.service.check_all().await;
        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].snapshot.ok);
        assert_eq!(report.results[0].snapshot.today_count, 2);
        assert_eq!(report.results[0].history.days().len(), 7);
        assert!(!report.results[1].snapshot.ok);
        assert_eq!(report.checked_at, "2024-01-15 21:00:00");
        assert_eq!(report.warn_hours, 6.0);
    }

    #[tokio::test]
    async fn test_silence_fires_suppresses_and_refires() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[7]));
        h.source.set("beta", posts_ago(&[1]));

        let report = h.service.evaluate_alerts().await;
        let alpha = &report.results[0];
        assert_eq!(alpha.silence.as_ref().unwrap().status, AlertStatus::Sent);
        assert_eq!(report.results[1].silence.as_ref().unwrap().status, AlertStatus::Clear);
        assert_eq!(report.alerts_sent, vec!["Alpha".to_string()]);
        assert!(h.notifier.sent()[0].contains("Alpha has not posted for 7 hours"));

        h.clock.advance(Duration::hours(1));
        let report = h.service.evaluate_alerts().await;
        let silence = report.results[0].silence.clone().unwrap();
        assert_eq!(silence.status, AlertStatus::Suppressed);
        assert_eq!(silence.reason.as_deref(), Some("already sent within 3 hours"));

        h.clock.advance(Duration::minutes(150));
        let report = h.service.evaluate_alerts().await;
        assert_eq!(
            report.results[0].silence.as_ref().unwrap().status,
            AlertStatus::Sent
        );
        assert_eq!(h.notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_goal_once_per_day() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]));
        h.source.set("beta", posts_ago(&[1]));

        let report = h.service.check_goals().await;
        assert_eq!(report.results[0].goal.status, AlertStatus::Sent);
        assert!(report.results[0].silence.is_none());
        assert_eq!(report.results[1].goal.status, AlertStatus::Clear);
        assert!(h.notifier.sent()[0].contains("Alpha published 12 posts today"));

        let report = h.service.check_goals().await;
        assert_eq!(report.results[0].goal.status, AlertStatus::Suppressed);
        assert_eq!(
            report.results[0].goal.reason.as_deref(),
            Some("already sent today")
        );
        assert!(report.alerts_sent.is_empty());
        assert_eq!(h.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_goal_rearms_next_day() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[0; 10]));
        h.source.set("beta", posts_ago(&[1]));
        h.service.check_goals().await;

        // Posts are re-dated so they still count as "today" after the clock moves.
        h.clock.advance(Duration::days(1));
        let next = start() + Duration::days(1);
        h.source.set(
            "alpha",
            (0..10)
                .map(|i| RawPost::new(format!("p{i}"), Some(next), "https://blog.example.com"))
                .collect(),
        );
        let report = h.service.check_goals().await;
        assert_eq!(report.results[0].goal.status, AlertStatus::Sent);
    }

    #[tokio::test]
    async fn test_injected_alert_state_suppresses_first_cycle() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]));
        h.source.set("beta", posts_ago(&[8]));

        let mut state = MemoryAlertState::new();
        state.record_goal("alpha", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        state.record_silence("beta", start() - Duration::hours(1));
        let service = h.service.with_alert_state(Box::new(state));

        let report = service.evaluate_alerts().await;
        let goal = &report.results[0].goal;
        assert_eq!(goal.status, AlertStatus::Suppressed);
        assert_eq!(goal.reason.as_deref(), Some("already sent today"));
        let silence = report.results[1].silence.as_ref().unwrap();
        assert_eq!(silence.status, AlertStatus::Suppressed);
        assert!(report.alerts_sent.is_empty());
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_feed_nums_follow_env_slots() {
        let mut config = config();
        config.feeds = vec![
            FeedConfig::new("alpha", "Alpha").with_num(1),
            FeedConfig::new("gamma", "Gamma").with_num(3),
        ];
        let service =
            MonitorService::new(&config, Arc::new(FakeSource::default()), Arc::new(DisabledStore))
                .unwrap();

        let nums: Vec<usize> = service.feeds().iter().map(|f| f.num).collect();
        assert_eq!(nums, vec![1, 3]);
        let report = service.check_all().await;
        assert_eq!(report.results[1].num, 3);
    }

    #[tokio::test]
    async fn test_failed_feed_reports_error_without_alert() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[1]));

        let report = h.service.evaluate_alerts().await;
        let beta = &report.results[1];
        assert_eq!(beta.goal.status, AlertStatus::Error);
        assert_eq!(
            beta.silence.as_ref().unwrap().reason.as_deref(),
            Some("fetch failed: connection refused")
        );
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_keeps_state() {
        let h = harness_with(
            Arc::new(DisabledStore),
            RecordingNotifier {
                fail: true,
                ..Default::default()
            },
        );
        h.source.set("alpha", posts_ago(&[8]));
        h.source.set("beta", posts_ago(&[1]));

        let report = h.service.evaluate_alerts().await;
        let silence = report.results[0].silence.clone().unwrap();
        assert_eq!(silence.status, AlertStatus::Error);
        assert!(report.alerts_sent.is_empty());

        let report = h.service.evaluate_alerts().await;
        assert_eq!(
            report.results[0].silence.as_ref().unwrap().status,
            AlertStatus::Suppressed
        );
    }

    #[tokio::test]
    async fn test_without_notifier_skips() {
        let source = Arc::new(FakeSource::default());
        source.set("alpha", posts_ago(&[9]));
        source.set("beta", posts_ago(&[9]));
        let service = MonitorService::new(&config(), source, Arc::new(DisabledStore))
            .unwrap()
            .with_clock(Arc::new(FixedClock::new(start())));

        let report = service.evaluate_alerts().await;
        assert!(report
            .results
            .iter()
            .all(|r| r.goal.status == AlertStatus::Skip));
        let manual = service.send_silence_alert("alpha", "9", "").await;
        assert_eq!(manual.status, AlertStatus::Skip);
        assert_eq!(service.send_daily_report().await.status, Status::Skip);
    }

    #[tokio::test]
    async fn test_manual_alert_shares_dedup_state() {
        let h = harness();
        let first = h.service.send_silence_alert("alpha", "12", "").await;
        assert_eq!(first.status, AlertStatus::Sent);
        assert!(h.notifier.sent()[0].contains("Alpha has not posted for 12 hours"));

        h.source.set("alpha", posts_ago(&[12]));
        h.source.set("beta", posts_ago(&[1]));
        let report = h.service.evaluate_alerts().await;
        assert_eq!(
            report.results[0].silence.as_ref().unwrap().status,
            AlertStatus::Suppressed
        );
    }

    #[tokio::test]
    async fn test_record_today_disabled_store() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[1, 2]));

        let report = h.service.record_today().await;
        assert_eq!(report.store, "disabled");
        assert_eq!(report.results[0].status, Status::Skip);
        assert_eq!(report.results[0].count, 2);
        assert_eq!(report.results[1].status, Status::Error);
    }

    #[tokio::test]
    async fn test_record_today_then_history() {
        use crate::db::Database;
        use crate::history::SqliteDailyCountStore;

        let store = Arc::new(SqliteDailyCountStore::new(
            Database::open_in_memory().await.unwrap(),
        ));
        let h = harness_with(store, RecordingNotifier::default());
        h.source.set("alpha", posts_ago(&[1, 2, 3]));
        h.source.set("beta", posts_ago(&[30]));

        let report = h.service.record_today().await;
        assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(report.results.iter().all(|r| r.status == Status::Ok));

        let check = h.service.check_all().await;
        let alpha = &check.results[0].history;
        assert_eq!(alpha.days()[6].count, 3);
        assert_eq!(check.results[1].history.total(), 0);
    }

    #[tokio::test]
    async fn test_daily_report() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[0; 11]));
        h.source.set("beta", posts_ago(&[1, 2]));

        let outcome = h.service.send_daily_report().await;
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.entries.len(), 2);
        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("2024-01-15"));
        assert!(sent[0].contains("⚠️ Alpha: 11"));
        assert!(sent[0].contains("✅ beta: 2"));
        assert!(sent[0].contains("Total posts: 13"));
    }

    #[tokio::test]
    async fn test_concurrent_cycles_send_once() {
        let h = harness();
        h.source.set("alpha", posts_ago(&[10]));
        h.source.set("beta", posts_ago(&[1]));
        let service = Arc::new(h.service);

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.evaluate_alerts().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(h.notifier.sent().len(), 1);
    }
}
