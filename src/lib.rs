//! blogmon - blog RSS monitor
//!
//! Polls a small set of blog feeds, records daily post counts and sends
//! deduplicated silence and goal alerts plus a daily report.

pub mod alert;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod feed;
pub mod history;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod report;
pub mod scheduler;
pub mod setup;
pub mod web;

pub use alert::{AlertDecision, AlertStateStore, GoalPolicy, MemoryAlertState, SilencePolicy};
pub use config::Config;
pub use datetime::{Calendar, Clock, FixedClock, SystemClock};
pub use db::Database;
pub use error::{BlogmonError, Result};
pub use feed::{FeedEvaluator, FeedSnapshot, FeedSource, RawPost, RssFeedSource};
pub use history::{
    DailyCount, DailyCountStore, DisabledStore, HistoryAggregator, HistoryWindow,
    PostgrestDailyCountStore, SqliteDailyCountStore,
};
pub use monitor::MonitorService;
pub use notify::{KakaoMemoNotifier, Notifier};
pub use report::{compose_daily_report, ReportEntry};
pub use scheduler::{start_scheduler, Scheduler};
pub use web::WebServer;
