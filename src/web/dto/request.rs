//! Request DTOs for the web API.

use serde::Deserialize;

use crate::web::error::ApiError;

/// Longest accepted blog identifier.
pub const MAX_BLOG_ID_LENGTH: usize = 64;

/// Query of the manual silence alert.
#[derive(Debug, Default, Deserialize)]
pub struct SendAlertQuery {
    /// Blog identifier used as the dedup key.
    #[serde(default)]
    pub blog_id: String,
    /// Hours shown in the message.
    #[serde(default)]
    pub hours: Option<String>,
    /// Label shown in the message; the configured label when empty.
    #[serde(default)]
    pub label: String,
}

impl SendAlertQuery {
    /// Check the query and return the trimmed blog id.
    pub fn validate(&self) -> Result<&str, ApiError> {
        let blog_id = self.blog_id.trim();
        if blog_id.is_empty() {
            return Err(ApiError::bad_request("blog_id is required"));
        }
        if blog_id.chars().count() > MAX_BLOG_ID_LENGTH {
            return Err(ApiError::bad_request(format!(
                "blog_id must be at most {MAX_BLOG_ID_LENGTH} characters"
            )));
        }
        Ok(blog_id)
    }

    /// Hours text, "?" when absent.
    pub fn hours_text(&self) -> &str {
        match self.hours.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => "?",
        }
    }
}
