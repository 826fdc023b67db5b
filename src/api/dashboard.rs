use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::core::state::AppState;
use crate::schemas::dashboard::DashboardResponse;
use crate::schemas::ApiResponse;
use crate::services::dashboard;


pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

async fn get_dashboard(State(state): State<AppState>) -> Json<ApiResponse<DashboardResponse>> {
    let settings = state.settings().dashboard();
    let response =
        dashboard::build(state.db(), settings.fanout_concurrency, settings.recent_limit).await;
    Json(ApiResponse::ok(response))
}
