//! RSS feed source.
//!
//! Fetches a blog's feed over HTTP and parses it with `feed-rs`.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;

use crate::config::SourceConfig;
use crate::error::{BlogmonError, Result};
use crate::feed::types::{RawPost, MAX_FEED_SIZE};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Anything that can list a blog's recent posts.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the blog's posts in feed order.
    ///
    /// Network failures map to [`BlogmonError::Transport`], malformed payloads
    /// to [`BlogmonError::Parse`].
    async fn fetch(&self, feed_id: &str) -> Result<Vec<RawPost>>;
}

/// HTTP feed source built from a URL template.
pub struct RssFeedSource {
    client: Client,
    url_template: String,
}

impl RssFeedSource {
    /// Create a new source.
    pub fn new(config: &SourceConfig, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeout_secs))
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BlogmonError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
        })
    }

    /// Feed URL for a blog identifier.
    pub fn feed_url(&self, feed_id: &str) -> String {
        self.url_template.replace("{id}", &urlencoding::encode(feed_id))
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self, feed_id: &str) -> Result<Vec<RawPost>> {
        let url = self.feed_url(feed_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BlogmonError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlogmonError::Transport(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(BlogmonError::Transport(format!(
                    "feed too large: {content_length} bytes"
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BlogmonError::Transport(e.to_string()))?;

        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(BlogmonError::Transport(format!(
                "feed too large: {} bytes",
                bytes.len()
            )));
        }

        parse_feed(&bytes)
    }
}

/// Parse feed bytes into posts, keeping feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawPost>> {
    let feed = parser::parse(bytes).map_err(|e| BlogmonError::Parse(e.to_string()))?;

    Ok(feed
        .entries
        .into_iter()
        .map(|entry| RawPost {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            published_at: entry.published.or(entry.updated),
            link: entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_feed_url() {
        let source = RssFeedSource::new(&SourceConfig::default(), 10).unwrap();
        assert_eq!(
            source.feed_url("myblog"),
            "https://rss.blog.naver.com/myblog.xml"
        );
    }

    #[test]
    fn test_feed_url_encodes_id() {
        let config = SourceConfig {
            url_template: "https://example.com/feed?blog={id}".to_string(),
            ..SourceConfig::default()
        };
        let source = RssFeedSource::new(&config, 10).unwrap();
        assert_eq!(
            source.feed_url("a b&c"),
            "https://example.com/feed?blog=a%20b%26c"
        );
    }

    #[test]
    fn test_parse_feed_rss() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>My Blog</title>
    <item>
      <title>Second post</title>
      <link>https://blog.example.com/2</link>
      <pubDate>Mon, 15 Jan 2024 10:30:00 +0900</pubDate>
    </item>
    <item>
      <title>First post</title>
      <link>https://blog.example.com/1</link>
      <pubDate>Sun, 14 Jan 2024 08:00:00 +0900</pubDate>
    </item>
  </channel>
</rss>"#;

        let posts = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Second post");
        assert_eq!(posts[0].link, "https://blog.example.com/2");
        assert_eq!(
            posts[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 1, 30, 0).unwrap())
        );
        assert_eq!(posts[1].title, "First post");
    }

    #[test]
    fn test_parse_feed_without_items() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        assert!(parse_feed(rss.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_missing_date() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item>
      <title>Undated</title>
      <link>https://blog.example.com/x</link>
    </item>
  </channel>
</rss>"#;
        let posts = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].published_at, None);
    }

    #[test]
    fn test_parse_feed_invalid() {
        let result = parse_feed(b"This is not XML");
        assert!(matches!(result, Err(BlogmonError::Parse(_))));
    }
}
