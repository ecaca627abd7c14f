//! Test helpers for integration tests.
//!
//! Provides in-memory fakes for the feed source and notifier plus a
//! pinned clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use blogmon::config::{Config, FeedConfig, StoreBackend};
use blogmon::{BlogmonError, FeedSource, FixedClock, Notifier, RawPost, Result};

/// 2024-01-15 21:00 in UTC+9.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

/// Feed source serving canned posts; unknown ids fail with a transport error.
#[derive(Default)]
pub struct FakeFeedSource {
    posts: Mutex<HashMap<String, Vec<RawPost>>>,
}

impl FakeFeedSource {
    /// Serve `posts` for `id`.
    pub fn set(&self, id: &str, posts: Vec<RawPost>) {
        self.posts.lock().unwrap().insert(id.to_string(), posts);
    }
}

#[async_trait]
impl FeedSource for FakeFeedSource {
    async fn fetch(&self, feed_id: &str) -> Result<Vec<RawPost>> {
        self.posts
            .lock()
            .unwrap()
            .get(feed_id)
            .cloned()
            .ok_or_else(|| BlogmonError::Transport("connection refused".into()))
    }
}

/// Notifier that records every message.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Messages sent so far.
    pub fn sent(&self) -> Vec<String> {
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
        Ok(())
    }
}

/// Posts published `hours` before [`start`].
pub fn posts_ago(hours: &[i64]) -> Vec<RawPost> {
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

/// Config with two feeds, no persistence and a dashboard link.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.feeds = vec![
        FeedConfig::new("alpha", "Alpha"),
        FeedConfig::new("beta", "Beta"),
    ];
    config.store.backend = StoreBackend::Disabled;
    config.monitor.dashboard_url = "https://dash.example.com".to_string();
    config
}

/// Shared fakes handed to a service under test.
pub struct Fakes {
    pub source: Arc<FakeFeedSource>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            source: Arc::new(FakeFeedSource::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            clock: Arc::new(FixedClock::new(start())),
        }
    }
}
