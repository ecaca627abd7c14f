//! Web API module for blogmon.
//!
//! JSON trigger endpoints over the monitor service, for cron jobs and the
//! dashboard.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
