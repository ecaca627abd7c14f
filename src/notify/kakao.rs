//! KakaoTalk "memo to self" notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::NotifyConfig;
use crate::notify::Notifier;
use crate::{BlogmonError, Result};

/// Longest response body quoted in an error.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct Link<'a> {
    web_url: &'a str,
    mobile_web_url: &'a str,
}

#[derive(Debug, Serialize)]
struct TextTemplate<'a> {
    object_type: &'static str,
    text: &'a str,
    link: Link<'a>,
}

/// Sends text templates through the memo API.
pub struct KakaoMemoNotifier {
    client: Client,
    endpoint: String,
    access_token: String,
    web_url: String,
}

impl KakaoMemoNotifier {
    /// Create a notifier.
    ///
    /// Returns [`BlogmonError::ConfigMissing`] when no access token is set.
    pub fn new(config: &NotifyConfig, web_url: &str, timeout_secs: u64) -> Result<Self> {
        let access_token = config.access_token.trim();
        if access_token.is_empty() {
            return Err(BlogmonError::ConfigMissing("notify access_token".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BlogmonError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            access_token: access_token.to_string(),
            web_url: web_url.to_string(),
        })
    }

    /// JSON `template_object` form field for a message.
    pub fn template_object(&self, text: &str) -> Result<String> {
        let template = TextTemplate {
            object_type: "text",
            text,
            link: Link {
                web_url: &self.web_url,
                mobile_web_url: &self.web_url,
            },
        };
        serde_json::to_string(&template)
            .map_err(|e| BlogmonError::Notify(format!("failed to encode template: {e}")))
    }
}

#[async_trait]
impl Notifier for KakaoMemoNotifier {
    fn channel_name(&self) -> &'static str {
        "kakao"
    }

    async fn send(&self, text: &str) -> Result<()> {
        let template = self.template_object(text)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .form(&[("template_object", template.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogmonError::Notify(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.chars().take(MAX_ERROR_BODY).collect::<String>()
            )));
        }

        debug!("Memo delivered ({} chars)", text.chars().count());
        Ok(())
    }
}

impl std::fmt::Debug for KakaoMemoNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakaoMemoNotifier")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
