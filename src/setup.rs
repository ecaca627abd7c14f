//! Builds the monitor service and its adapters from configuration.
//!
//! Missing credentials never abort startup: the affected adapter is replaced
//! by its disabled form and the dependent operations report `skip`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, StoreBackend};
use crate::db::Database;
use crate::feed::RssFeedSource;
use crate::history::{
    DailyCountStore, DisabledStore, PostgrestDailyCountStore, SqliteDailyCountStore,
};
use crate::monitor::MonitorService;
use crate::notify::{KakaoMemoNotifier, Notifier};
use crate::{BlogmonError, Result};

/// Open the configured daily count store.
pub async fn build_store(config: &Config) -> Arc<dyn DailyCountStore> {
    let store = &config.store;
    match store.backend {
        StoreBackend::Sqlite => match Database::open(&store.path).await {
            Ok(db) => Arc::new(SqliteDailyCountStore::new(db)),
            Err(e) => {
                warn!("Failed to open database {}: {}. History is disabled.", store.path, e);
                Arc::new(DisabledStore)
            }
        },
        StoreBackend::Postgrest => {
            match PostgrestDailyCountStore::new(store, config.monitor.request_timeout_secs) {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    warn!("PostgREST store unavailable: {}. History is disabled.", e);
                    Arc::new(DisabledStore)
                }
            }
        }
        StoreBackend::Disabled => Arc::new(DisabledStore),
    }
}

/// Create the notifier, or `None` when no token is configured.
pub fn build_notifier(config: &Config) -> Result<Option<Arc<dyn Notifier>>> {
    match KakaoMemoNotifier::new(
        &config.notify,
        &config.monitor.dashboard_url,
        config.monitor.request_timeout_secs,
    ) {
        Ok(n) => {
            let notifier: Arc<dyn Notifier> = Arc::new(n);
            Ok(Some(notifier))
        }
        Err(BlogmonError::ConfigMissing(what)) => {
            info!("Notifications disabled ({} not set)", what);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Build the monitor service with real adapters.
pub async fn build_service(config: &Config) -> Result<Arc<MonitorService>> {
    let source = Arc::new(RssFeedSource::new(
        &config.source,
        config.monitor.request_timeout_secs,
    )?);
    let store = build_store(config).await;
    info!("Daily count store: {}", store.backend_name());

    let mut service = MonitorService::new(config, source, store)?;
    if let Some(notifier) = build_notifier(config)? {
        service = service.with_notifier(notifier);
    }
    Ok(Arc::new(service))
}
