//! History module for blogmon.
//!
//! Daily post counts per blog and the seven-day windows built from them.

pub mod aggregator;
pub mod postgrest;
pub mod store;
pub mod types;

pub use aggregator::HistoryAggregator;
pub use postgrest::PostgrestDailyCountStore;
pub use store::{DailyCountStore, DisabledStore, SqliteDailyCountStore};
pub use types::{DailyCount, HistoryDay, HistoryWindow, HISTORY_DAYS};
