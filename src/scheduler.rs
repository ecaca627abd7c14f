//! Background scheduler for blogmon.
//!
//! Periodically evaluates alerts and records daily counts, and sends the
//! daily report once per day at the configured local hour.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::monitor::{MonitorService, Status};

/// Shortest accepted check interval in seconds.
pub const MIN_CHECK_INTERVAL_SECS: u64 = 30;

/// Whether the daily report should go out at `now`.
///
/// True during `report_hour` if no report was sent yet on `now`'s date.
pub fn report_due(
    report_hour: Option<u32>,
    now: &DateTime<FixedOffset>,
    last_report: Option<NaiveDate>,
) -> bool {
    match report_hour {
        Some(hour) => now.hour() == hour && last_report != Some(now.date_naive()),
        None => false,
    }
}

/// Periodic trigger for the monitor service.
pub struct Scheduler {
    service: Arc<MonitorService>,
    check_interval: Duration,
    report_hour: Option<u32>,
}

impl Scheduler {
    /// Create a new scheduler.
    pub fn new(service: Arc<MonitorService>, config: &SchedulerConfig) -> Self {
        Self {
            service,
            check_interval: Duration::from_secs(
                config.check_interval_secs.max(MIN_CHECK_INTERVAL_SECS),
            ),
            report_hour: config.report_hour,
        }
    }

    /// Interval between two cycles.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Run the scheduler loop forever.
    pub async fn run(&self) {
        info!(
            "Scheduler started (check interval: {} seconds, report hour: {:?})",
            self.check_interval.as_secs(),
            self.report_hour
        );

        let mut timer = interval(self.check_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_report: Option<NaiveDate> = None;

        loop {
            timer.tick().await;
            self.run_cycle().await;

            let now = self.service.local_now();
            if report_due(self.report_hour, &now, last_report) {
                let outcome = self.service.send_daily_report().await;
                match outcome.status {
                    Status::Ok => info!("Scheduled daily report sent for {}", outcome.date),
                    Status::Skip => debug!("Scheduled daily report skipped: {:?}", outcome.reason),
                    Status::Error => warn!("Scheduled daily report failed: {:?}", outcome.reason),
                }
                last_report = Some(now.date_naive());
            }
        }
    }

    /// One alert + record cycle.
    pub async fn run_cycle(&self) {
        debug!("Running scheduled check cycle");

        let alerts = self.service.evaluate_alerts().await;
        if !alerts.alerts_sent.is_empty() {
            info!("Alerts sent for: {}", alerts.alerts_sent.join(", "));
        }

        let recorded = self.service.record_today().await;
        let failed = recorded
            .results
            .iter()
            .filter(|r| r.status == Status::Error)
            .count();
        if failed > 0 {
            warn!("{} feed(s) could not be recorded for {}", failed, recorded.date);
        }
    }
}

/// Spawn the scheduler as a background task.
pub fn start_scheduler(service: Arc<MonitorService>, config: &SchedulerConfig) -> JoinHandle<()> {
    let scheduler = Scheduler::new(service, config);
    tokio::spawn(async move {
        scheduler.run().await;
    })
}
