//! Feed module for blogmon.
//!
//! Fetching posts from a blog and turning them into per-feed snapshots.

pub mod evaluator;
pub mod source;
pub mod types;

pub use evaluator::{FeedEvaluator, NO_POSTS_ERROR, PARSE_ERROR};
pub use source::{parse_feed, FeedSource, RssFeedSource};
pub use types::{FeedSnapshot, PostView, RawPost, DEFAULT_MAX_POSTS, MAX_ERROR_LENGTH};
