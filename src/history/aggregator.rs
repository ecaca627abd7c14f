//! Seven-day history windows over a [`DailyCountStore`].

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::history::store::DailyCountStore;
use crate::history::types::{HistoryWindow, HISTORY_DAYS};

/// Builds zero-filled history windows.
#[derive(Clone)]
pub struct HistoryAggregator {
    store: Arc<dyn DailyCountStore>,
}

impl HistoryAggregator {
    /// Create a new aggregator.
    pub fn new(store: Arc<dyn DailyCountStore>) -> Self {
        Self { store }
    }

    /// Window of the seven days ending on `today`.
    ///
    /// Store failures are logged and produce an all-zero window.
    pub async fn window(&self, blog_id: &str, today: NaiveDate) -> HistoryWindow {
        let mut window = HistoryWindow::zeroed(today);
        let since = today - Duration::days(HISTORY_DAYS as i64 - 1);

        match self.store.query_since(blog_id, since).await {
            Ok(rows) => {
                for row in rows {
                    window.set(row.date, row.count);
                }
            }
            Err(e) => {
                warn!("History read failed for {}: {}", blog_id, e);
            }
        }

        window
    }
}

impl std::fmt::Debug for HistoryAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryAggregator")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::types::DailyCount;
    use crate::{BlogmonError, Result};
    use async_trait::async_trait;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Returns canned rows regardless of the requested range.
    struct CannedStore(Vec<DailyCount>);

    #[async_trait]
    impl DailyCountStore for CannedStore {
        fn backend_name(&self) -> &'static str {
            "canned"
        }

        async fn upsert(&self, _count: &DailyCount) -> Result<()> {
            Ok(())
        }

        async fn query_since(&self, _blog_id: &str, _since: NaiveDate) -> Result<Vec<DailyCount>> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DailyCountStore for FailingStore {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn upsert(&self, _count: &DailyCount) -> Result<()> {
            Err(BlogmonError::Transport("down".into()))
        }

        async fn query_since(&self, _blog_id: &str, _since: NaiveDate) -> Result<Vec<DailyCount>> {
            Err(BlogmonError::Transport("down".into()))
        }
    }

    #[tokio::test]
    async fn test_sparse_rows_zero_filled() {
        let store = CannedStore(vec![
            DailyCount::new("blog", date(2024, 1, 10), 3),
            DailyCount::new("blog", date(2024, 1, 15), 5),
        ]);
        let window = HistoryAggregator::new(Arc::new(store))
            .window("blog", date(2024, 1, 15))
            .await;

        let counts: Vec<u32> = window.days().iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 3, 0, 0, 0, 0, 5]);
        assert_eq!(window.start(), date(2024, 1, 9));
    }

    #[tokio::test]
    async fn test_rows_outside_window_ignored() {
        let store = CannedStore(vec![
            DailyCount::new("blog", date(2024, 1, 8), 9),
            DailyCount::new("blog", date(2024, 1, 16), 9),
        ]);
        let window = HistoryAggregator::new(Arc::new(store))
            .window("blog", date(2024, 1, 15))
            .await;
        assert_eq!(window.total(), 0);
        assert_eq!(window.days().len(), HISTORY_DAYS);
    }

    #[tokio::test]
    async fn test_store_error_yields_zeros() {
        let window = HistoryAggregator::new(Arc::new(FailingStore))
            .window("blog", date(2024, 1, 15))
            .await;
        assert_eq!(window, HistoryWindow::zeroed(date(2024, 1, 15)));
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        use crate::db::Database;
        use crate::history::store::SqliteDailyCountStore;

        let store = SqliteDailyCountStore::new(Database::open_in_memory().await.unwrap());
        store
            .upsert(&DailyCount::new("blog", date(2024, 1, 14), 2))
            .await
            .unwrap();
        store
            .upsert(&DailyCount::new("blog", date(2024, 1, 14), 4))
            .await
            .unwrap();

        let window = HistoryAggregator::new(Arc::new(store))
            .window("blog", date(2024, 1, 15))
            .await;
        assert_eq!(window.count_on(date(2024, 1, 14)), Some(4));
        assert_eq!(window.total(), 4);
    }
}
