//! Notification module for blogmon.
//!
//! Delivers alert and report text to a single fixed recipient.

mod kakao;

pub use kakao::KakaoMemoNotifier;

use async_trait::async_trait;

use crate::Result;

/// A channel that delivers text messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name for logs.
    fn channel_name(&self) -> &'static str;

    /// Deliver one message.
    ///
    /// Auth, rate-limit and HTTP failures map to [`crate::BlogmonError::Notify`],
    /// network failures to [`crate::BlogmonError::Transport`].
    async fn send(&self, text: &str) -> Result<()>;
}
