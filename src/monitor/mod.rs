//! Monitor module for blogmon.
//!
//! The trigger operations that tie feeds, history, alerts and reports together.

pub mod service;
pub mod types;

pub use service::{AlertScope, MonitorService, NO_NOTIFIER, NO_STORE};
pub use types::{
    AlertOutcome, AlertReport, AlertStatus, CheckReport, DailyReportOutcome, FeedAlerts,
    FeedCheck, FeedInfo, RecordOutcome, RecordReport, Status,
};
