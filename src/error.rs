//! Error types for blogmon.

use thiserror::Error;

/// Common error type for blogmon.
#[derive(Error, Debug)]
pub enum BlogmonError {
    /// Network or timeout failure while talking to a feed, store or notifier.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed feed payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// A credential or endpoint required by a feature is absent.
    ///
    /// The dependent feature is skipped rather than attempted.
    #[error("missing configuration: {0}")]
    ConfigMissing(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Notification channel rejected the message.
    #[error("notification error: {0}")]
    Notify(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

impl BlogmonError {
    /// Short reason suitable for per-feed status fields.
    ///
    /// Truncated to `max_chars` characters.
    pub fn short_reason(&self, max_chars: usize) -> String {
        self.to_string().chars().take(max_chars).collect()
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for BlogmonError {
    fn from(e: sqlx::Error) -> Self {
        BlogmonError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for BlogmonError {
    fn from(e: reqwest::Error) -> Self {
        BlogmonError::Transport(e.to_string())
    }
}

/// Result type alias for blogmon operations.
pub type Result<T> = std::result::Result<T, BlogmonError>;
