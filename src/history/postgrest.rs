//! PostgREST-backed daily count store.
//!
//! Talks to a hosted `blog_stats` table (Supabase style) over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::history::store::{row_to_count, DailyCountStore};
use crate::history::types::DailyCount;
use crate::{BlogmonError, Result};

/// Upsert preference asking PostgREST to merge on the conflict key.
const UPSERT_PREFER: &str = "return=minimal,resolution=merge-duplicates";

#[derive(Debug, Serialize)]
struct UpsertBody<'a> {
    blog_id: &'a str,
    date: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct PostgrestRow {
    blog_id: String,
    date: String,
    count: i64,
}

/// Daily count store over a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct PostgrestDailyCountStore {
    client: Client,
    base_url: String,
    table: String,
}

impl PostgrestDailyCountStore {
    /// Create a new store.
    ///
    /// Returns [`BlogmonError::ConfigMissing`] when the URL or key is empty.
    pub fn new(config: &StoreConfig, timeout_secs: u64) -> Result<Self> {
        if config.url.trim().is_empty() || config.key.trim().is_empty() {
            return Err(BlogmonError::ConfigMissing(
                "store url and key are required for the postgrest backend".into(),
            ));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(config.key.trim())
            .map_err(|e| BlogmonError::Config(format!("invalid store key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key.trim()))
            .map_err(|e| BlogmonError::Config(format!("invalid store key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| BlogmonError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            table: config.table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// URL used for upserts.
    pub fn upsert_url(&self) -> String {
        format!("{}?on_conflict=blog_id,date", self.table_url())
    }

    /// URL used to read a blog's rows from `since` onwards.
    pub fn select_url(&self, blog_id: &str, since: NaiveDate) -> String {
        format!(
            "{}?blog_id=eq.{}&date=gte.{}&order=date.asc",
            self.table_url(),
            urlencoding::encode(blog_id),
            since.format("%Y-%m-%d")
        )
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BlogmonError::Transport(format!(
        "HTTP error: {} {}",
        status,
        body.chars().take(120).collect::<String>()
    )))
}

#[async_trait]
impl DailyCountStore for PostgrestDailyCountStore {
    fn backend_name(&self) -> &'static str {
        "postgrest"
    }

    async fn upsert(&self, count: &DailyCount) -> Result<()> {
        let body = UpsertBody {
            blog_id: &count.blog_id,
            date: count.date.format("%Y-%m-%d").to_string(),
            count: count.count,
        };

        let response = self
            .client
            .post(self.upsert_url())
            .header("Prefer", UPSERT_PREFER)
            .json(&body)
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }

    async fn query_since(&self, blog_id: &str, since: NaiveDate) -> Result<Vec<DailyCount>> {
        let response = self
            .client
            .get(self.select_url(blog_id, since))
            .send()
            .await?;
        let rows: Vec<PostgrestRow> = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BlogmonError::Parse(format!("invalid store response: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row_to_count(row.blog_id, &row.date, row.count))
            .collect())
    }
}
