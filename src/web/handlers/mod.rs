//! API handlers for the web API.

pub mod monitor;

pub use monitor::*;

use std::sync::Arc;

use crate::monitor::MonitorService;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Monitor service.
    pub service: Arc<MonitorService>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(service: Arc<MonitorService>) -> Self {
        Self { service }
    }
}
