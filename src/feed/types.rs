//! Feed types for blogmon.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Maximum length of the error text carried by a failed snapshot.
pub const MAX_ERROR_LENGTH: usize = 80;

/// Default number of most recent posts kept per snapshot.
pub const DEFAULT_MAX_POSTS: usize = 15;

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// A post as returned by the feed source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    /// Post title.
    pub title: String,
    /// Publish time; `None` when the feed's date could not be parsed.
    pub published_at: Option<DateTime<Utc>>,
    /// Link to the post.
    pub link: String,
}

impl RawPost {
    /// Create a new post.
    pub fn new(
        title: impl Into<String>,
        published_at: Option<DateTime<Utc>>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            published_at,
            link: link.into(),
        }
    }
}

/// A kept post annotated with its age.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    /// Post title.
    pub title: String,
    /// Publish time in the monitor's timezone.
    pub published_at: DateTime<FixedOffset>,
    /// Exact hours since publication.
    #[serde(skip)]
    pub elapsed_hours: f64,
    /// Hours since publication, rounded to 0.1.
    #[serde(rename = "hoursAgo")]
    pub hours_ago: f64,
    /// Relative label such as "3 hours 5 minutes ago".
    #[serde(rename = "timeLabel")]
    pub time_label: String,
    /// Link to the post.
    pub link: String,
}

/// Normalized current state of one feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    /// Feed identifier.
    pub feed_id: String,
    /// Whether the feed could be fetched and contained posts.
    pub ok: bool,
    /// Short error text for failed snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Most recent posts, newest first.
    pub posts: Vec<PostView>,
    /// Kept posts published today.
    pub today_count: u32,
}

impl FeedSnapshot {
    /// A failed snapshot with the error truncated to [`MAX_ERROR_LENGTH`].
    pub fn failed(feed_id: impl Into<String>, error: &str) -> Self {
        Self {
            feed_id: feed_id.into(),
            ok: false,
            error: Some(error.chars().take(MAX_ERROR_LENGTH).collect()),
            posts: Vec::new(),
            today_count: 0,
        }
    }

    /// Hours since the newest kept post, if any.
    pub fn newest_elapsed_hours(&self) -> Option<f64> {
        self.posts.first().map(|p| p.elapsed_hours)
    }
}
