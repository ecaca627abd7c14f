//! Monitor handlers for the web API.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::monitor::{
    AlertOutcome, AlertReport, CheckReport, DailyReportOutcome, FeedInfo, RecordReport,
};
use crate::web::dto::{ApiResponse, SendAlertQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/feeds - List configured feeds.
pub async fn list_feeds(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<FeedInfo>>> {
    Json(ApiResponse::new(state.service.feeds()))
}

/// GET /api/check - Snapshot and history of every feed.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CheckReport>> {
    Json(ApiResponse::new(state.service.check_all().await))
}

/// GET|POST /api/record - Record today's counts.
pub async fn record(State(state): State<Arc<AppState>>) -> Json<ApiResponse<RecordReport>> {
    Json(ApiResponse::new(state.service.record_today().await))
}

/// GET /api/alerts - Run the silence and goal policies.
pub async fn alerts(State(state): State<Arc<AppState>>) -> Json<ApiResponse<AlertReport>> {
    Json(ApiResponse::new(state.service.evaluate_alerts().await))
}

/// GET /api/check-goal - Run the goal policy only.
pub async fn check_goal(State(state): State<Arc<AppState>>) -> Json<ApiResponse<AlertReport>> {
    Json(ApiResponse::new(state.service.check_goals().await))
}

/// GET|POST /api/send-alert - Send a manual silence alert.
pub async fn send_alert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SendAlertQuery>,
) -> Result<Json<ApiResponse<AlertOutcome>>, ApiError> {
    let blog_id = query.validate()?;
    let outcome = state
        .service
        .send_silence_alert(blog_id, query.hours_text(), &query.label)
        .await;
    Ok(Json(ApiResponse::new(outcome)))
}

/// GET /api/daily-report - Compose and send the daily report.
pub async fn daily_report(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<DailyReportOutcome>> {
    Json(ApiResponse::new(state.service.send_daily_report().await))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
