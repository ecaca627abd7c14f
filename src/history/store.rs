//! Daily count persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;
use tracing::warn;

use crate::db::Database;
use crate::history::types::DailyCount;
use crate::{BlogmonError, Result};

/// Key-value table of (blog id, date) → post count.
#[async_trait]
pub trait DailyCountStore: Send + Sync {
    /// Short backend name for logs and responses.
    fn backend_name(&self) -> &'static str;

    /// Whether writes can succeed at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Insert the count, replacing any existing row for the same key.
    async fn upsert(&self, count: &DailyCount) -> Result<()>;

    /// All rows for `blog_id` with `date >= since`, ascending by date.
    async fn query_since(&self, blog_id: &str, since: NaiveDate) -> Result<Vec<DailyCount>>;
}

/// Store used when no backend is configured.
///
/// Reads are empty and writes report [`BlogmonError::ConfigMissing`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl DailyCountStore for DisabledStore {
    fn backend_name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn upsert(&self, _count: &DailyCount) -> Result<()> {
        Err(BlogmonError::ConfigMissing("daily count store".into()))
    }

    async fn query_since(&self, _blog_id: &str, _since: NaiveDate) -> Result<Vec<DailyCount>> {
        Ok(Vec::new())
    }
}

/// Row type for daily counts from the database.
#[derive(Debug, Clone, FromRow)]
struct DailyCountRow {
    blog_id: String,
    date: String,
    count: i64,
}

/// Convert a raw row, dropping rows whose date is not `YYYY-MM-DD`.
pub(crate) fn row_to_count(blog_id: String, date: &str, count: i64) -> Option<DailyCount> {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => Some(DailyCount {
            blog_id,
            date,
            count: u32::try_from(count).unwrap_or(0),
        }),
        Err(_) => {
            warn!("Ignoring daily count for {} with bad date {:?}", blog_id, date);
            None
        }
    }
}

/// SQLite-backed daily count store.
#[derive(Debug, Clone)]
pub struct SqliteDailyCountStore {
    db: Database,
}

impl SqliteDailyCountStore {
    /// Create a new store over an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DailyCountStore for SqliteDailyCountStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn upsert(&self, count: &DailyCount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_stats (blog_id, date, count)
            VALUES ($1, $2, $3)
            ON CONFLICT (blog_id, date) DO UPDATE SET
                count = excluded.count,
                updated_at = datetime('now')
            "#,
        )
        .bind(&count.blog_id)
        .bind(count.date.format("%Y-%m-%d").to_string())
        .bind(i64::from(count.count))
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn query_since(&self, blog_id: &str, since: NaiveDate) -> Result<Vec<DailyCount>> {
        let rows = sqlx::query_as::<_, DailyCountRow>(
            r#"
            SELECT blog_id, date, count
            FROM blog_stats
            WHERE blog_id = $1 AND date >= $2
            ORDER BY date ASC
            "#,
        )
        .bind(blog_id)
        .bind(since.format("%Y-%m-%d").to_string())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row_to_count(row.blog_id, &row.date, row.count))
            .collect())
    }
}
