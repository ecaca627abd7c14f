//! Turns a feed source result into a [`FeedSnapshot`].

use chrono::{DateTime, Utc};

use crate::datetime::{elapsed_hours, relative_label, round_tenth, Calendar};
use crate::error::{BlogmonError, Result};
use crate::feed::types::{FeedSnapshot, PostView, RawPost, DEFAULT_MAX_POSTS};

/// Error text for a payload that is not a feed.
pub const PARSE_ERROR: &str = "XML parse error";

/// Error text for a feed without items.
pub const NO_POSTS_ERROR: &str = "no posts";

/// Builds snapshots in a fixed calendar.
#[derive(Debug, Clone, Copy)]
pub struct FeedEvaluator {
    calendar: Calendar,
    max_posts: usize,
}

impl FeedEvaluator {
    /// Create an evaluator keeping [`DEFAULT_MAX_POSTS`] posts.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            max_posts: DEFAULT_MAX_POSTS,
        }
    }

    /// Keep at most `max_posts` posts per snapshot.
    pub fn with_max_posts(mut self, max_posts: usize) -> Self {
        self.max_posts = max_posts.max(1);
        self
    }

    /// Build a snapshot from the source's result.
    ///
    /// Never fails: fetch and parse errors become `ok = false` snapshots.
    /// Posts with unparseable dates are dropped. `today_count` only sees the
    /// kept posts, so a day with more than `max_posts` posts is undercounted.
    pub fn evaluate(
        &self,
        feed_id: &str,
        fetched: Result<Vec<RawPost>>,
        now: DateTime<Utc>,
    ) -> FeedSnapshot {
        let raw = match fetched {
            Ok(raw) => raw,
            Err(BlogmonError::Parse(_)) => return FeedSnapshot::failed(feed_id, PARSE_ERROR),
            Err(BlogmonError::Transport(msg)) => {
                return FeedSnapshot::failed(feed_id, &format!("fetch failed: {msg}"))
            }
            Err(e) => return FeedSnapshot::failed(feed_id, &e.to_string()),
        };

        if raw.is_empty() {
            return FeedSnapshot::failed(feed_id, NO_POSTS_ERROR);
        }

        let mut dated: Vec<(DateTime<Utc>, RawPost)> = raw
            .into_iter()
            .filter_map(|post| post.published_at.map(|at| (at, post)))
            .collect();
        // Stable, so an already newest-first feed keeps its order.
        dated.sort_by(|a, b| b.0.cmp(&a.0));
        dated.truncate(self.max_posts);

        let today = self.calendar.date_of(&now);
        let mut today_count = 0;
        let posts = dated
            .into_iter()
            .map(|(published, post)| {
                if self.calendar.date_of(&published) == today {
                    today_count += 1;
                }
                let elapsed = elapsed_hours(&published, &now);
                PostView {
                    title: post.title,
                    published_at: self.calendar.localize(&published),
                    elapsed_hours: elapsed,
                    hours_ago: round_tenth(elapsed),
                    time_label: relative_label(elapsed),
                    link: post.link,
                }
            })
            .collect();

        FeedSnapshot {
            feed_id: feed_id.to_string(),
            ok: true,
            error: None,
            posts,
            today_count,
        }
    }
}
