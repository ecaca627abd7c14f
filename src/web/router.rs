//! Router configuration for the web API.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    alerts, check, check_goal, daily_report, list_feeds, not_found, record, send_alert, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/feeds", get(list_feeds))
        .route("/check", get(check))
        .route("/record", get(record).post(record))
        .route("/alerts", get(alerts))
        .route("/check-goal", get(check_goal))
        .route("/send-alert", get(send_alert).post(send_alert))
        .route("/daily-report", get(daily_report));

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health_body() {
        use axum::body::Body;
        use axum::http::Request;
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        let response = create_health_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_health_router() {
        let server = TestServer::new(create_health_router()).unwrap();
        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }
}
