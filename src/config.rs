//! Configuration module for blogmon.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::{BlogmonError, Result};

/// Maximum number of monitored feeds.
pub const MAX_FEEDS: usize = 6;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/blogmon.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Alerting thresholds and calendar settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Offset of the reporting timezone from UTC, in hours.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    /// Hours without a new post before a silence alert is raised.
    #[serde(default = "default_warn_hours")]
    pub warn_hours: f64,
    /// Minimum hours between two silence alerts for the same feed.
    #[serde(default = "default_alert_interval")]
    pub alert_interval_hours: f64,
    /// Same-day post count that triggers a goal alert.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    /// Number of most recent posts kept per snapshot.
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,
    /// Timeout for every outbound request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Link appended to every notification.
    #[serde(default)]
    pub dashboard_url: String,
}

fn default_utc_offset() -> i32 {
    9
}

fn default_warn_hours() -> f64 {
    6.0
}

fn default_alert_interval() -> f64 {
    3.0
}

fn default_daily_goal() -> u32 {
    10
}

fn default_max_posts() -> usize {
    15
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset(),
            warn_hours: default_warn_hours(),
            alert_interval_hours: default_alert_interval(),
            daily_goal: default_daily_goal(),
            max_posts: default_max_posts(),
            request_timeout_secs: default_request_timeout(),
            dashboard_url: String::new(),
        }
    }
}

/// A monitored blog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Blog identifier used to build the feed URL.
    pub id: String,
    /// Display label used in notifications.
    #[serde(default)]
    pub label: String,
    /// Display number; the 1-based list position when unset.
    #[serde(default)]
    pub num: Option<usize>,
}

impl FeedConfig {
    /// Create a new feed entry.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            num: None,
        }
    }

    /// Pin the display number.
    pub fn with_num(mut self, num: usize) -> Self {
        self.num = Some(num);
        self
    }

    /// Display number for the feed at list position `index`.
    pub fn display_num(&self, index: usize) -> usize {
        self.num.unwrap_or(index + 1)
    }

    /// Label shown to humans; the id when no label is set.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Feed source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Feed URL template; `{id}` is replaced with the blog identifier.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// User agent sent with feed requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url_template() -> String {
    "https://rss.blog.naver.com/{id}.xml".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            user_agent: default_user_agent(),
        }
    }
}

/// Backend used for daily counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite database.
    Sqlite,
    /// Hosted PostgREST table (e.g. Supabase).
    Postgrest,
    /// No persistence; history is always zero.
    Disabled,
}

/// Daily count store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Which backend to use.
    #[serde(default = "default_store_backend")]
    pub backend: StoreBackend,
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// PostgREST base URL.
    #[serde(default)]
    pub url: String,
    /// PostgREST API key.
    #[serde(default)]
    pub key: String,
    /// PostgREST table name.
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Sqlite
}

fn default_db_path() -> String {
    "data/blogmon.db".to_string()
}

fn default_table() -> String {
    "blog_stats".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_db_path(),
            url: String::new(),
            key: String::new(),
            table: default_table(),
        }
    }
}

/// Notification channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Bearer token for the memo API. Empty disables notifications.
    #[serde(default)]
    pub access_token: String,
    /// Memo API endpoint.
    #[serde(default = "default_notify_endpoint")]
    pub endpoint: String,
}

fn default_notify_endpoint() -> String {
    "https://kapi.kakao.com/v2/api/talk/memo/default/send".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            endpoint: default_notify_endpoint(),
        }
    }
}

/// Built-in scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the built-in scheduler runs.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between two check cycles.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    /// Local hour (0-23) at which the daily report is sent.
    #[serde(default)]
    pub report_hour: Option<u32>,
}

fn default_check_interval() -> u64 {
    600
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            check_interval_secs: default_check_interval(),
            report_hour: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Thresholds and calendar.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Monitored blogs in display order.
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    /// Feed source.
    #[serde(default)]
    pub source: SourceConfig,
    /// Daily count store.
    #[serde(default)]
    pub store: StoreConfig,
    /// Notification channel.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Built-in scheduler.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BlogmonError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BlogmonError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Supported keys:
    /// - `BLOG1`..`BLOG6` / `LABEL1`..`LABEL6`: replace the feed list when any `BLOGn` is set
    /// - `WARN_HOURS`, `ALERT_INTERVAL_HOURS`, `DAILY_GOAL`: thresholds
    /// - `SUPABASE_URL` + `SUPABASE_KEY`: switch the store to PostgREST
    /// - `KAKAO_ACCESS_TOKEN`: notification token
    /// - `DASHBOARD_URL`, `PORT`
    ///
    /// Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env_feeds: Vec<FeedConfig> = (1..=MAX_FEEDS)
            .filter_map(|n| {
                let id = get(&format!("BLOG{n}"))?;
                let label = get(&format!("LABEL{n}")).unwrap_or_default();
                Some(FeedConfig::new(id.trim(), label).with_num(n))
            })
            .collect();
        if !env_feeds.is_empty() {
            self.feeds = env_feeds;
        }

        if let Some(v) = get("WARN_HOURS") {
            self.monitor.warn_hours = parse_env("WARN_HOURS", &v)?;
        }
        if let Some(v) = get("ALERT_INTERVAL_HOURS") {
            self.monitor.alert_interval_hours = parse_env("ALERT_INTERVAL_HOURS", &v)?;
        }
        if let Some(v) = get("DAILY_GOAL") {
            self.monitor.daily_goal = parse_env("DAILY_GOAL", &v)?;
        }
        if let Some(v) = get("DASHBOARD_URL") {
            self.monitor.dashboard_url = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }

        if let (Some(url), Some(key)) = (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            self.store.backend = StoreBackend::Postgrest;
            self.store.url = url;
            self.store.key = key;
        }

        if let Some(token) = get("KAKAO_ACCESS_TOKEN") {
            self.notify.access_token = token;
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.feeds.len() > MAX_FEEDS {
            return Err(BlogmonError::Validation(format!(
                "at most {} feeds can be monitored, got {}",
                MAX_FEEDS,
                self.feeds.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut nums = HashSet::new();
        for (i, feed) in self.feeds.iter().enumerate() {
            if feed.id.trim().is_empty() {
                return Err(BlogmonError::Validation("feed id must not be empty".into()));
            }
            if !seen.insert(feed.id.as_str()) {
                return Err(BlogmonError::Validation(format!(
                    "duplicate feed id: {}",
                    feed.id
                )));
            }
            let num = feed.display_num(i);
            if !(1..=MAX_FEEDS).contains(&num) || !nums.insert(num) {
                return Err(BlogmonError::Validation(format!(
                    "invalid or duplicate feed num {} for {}",
                    num, feed.id
                )));
            }
        }

        let m = &self.monitor;
        if m.warn_hours.is_nan() || m.warn_hours <= 0.0 {
            return Err(BlogmonError::Validation("warn_hours must be positive".into()));
        }
        if m.alert_interval_hours.is_nan() || m.alert_interval_hours <= 0.0 {
            return Err(BlogmonError::Validation(
                "alert_interval_hours must be positive".into(),
            ));
        }
        if m.daily_goal == 0 {
            return Err(BlogmonError::Validation("daily_goal must be at least 1".into()));
        }
        if m.max_posts == 0 {
            return Err(BlogmonError::Validation("max_posts must be at least 1".into()));
        }
        if !(-12..=14).contains(&m.utc_offset_hours) {
            return Err(BlogmonError::Validation(format!(
                "utc_offset_hours out of range: {}",
                m.utc_offset_hours
            )));
        }
        check_url("monitor.dashboard_url", &m.dashboard_url)?;
        check_url("notify.endpoint", &self.notify.endpoint)?;
        check_url("store.url", &self.store.url)?;
        if !self.source.url_template.contains("{id}") {
            return Err(BlogmonError::Validation(
                "source.url_template must contain {id}".into(),
            ));
        }
        check_url(
            "source.url_template",
            &self.source.url_template.replace("{id}", "blog"),
        )?;

        if let Some(hour) = self.scheduler.report_hour {
            if hour > 23 {
                return Err(BlogmonError::Validation(format!(
                    "report_hour out of range: {hour}"
                )));
            }
        }
        Ok(())
    }
}

/// Empty values are allowed; anything else must be an absolute http(s) URL.
fn check_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match url::Url::parse(value.trim()) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(()),
        Ok(u) => Err(BlogmonError::Validation(format!(
            "{field} must use http or https, got {}",
            u.scheme()
        ))),
        Err(e) => Err(BlogmonError::Validation(format!("{field} is not a valid URL: {e}"))),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BlogmonError::Config(format!("invalid value for {key}: {value}")))
}
