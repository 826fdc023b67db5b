use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::core::metrics;
use crate::core::state::AppState;
use crate::db::latency::Latency;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let api = state.settings().api();
    let response = RootResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        api_prefix: api.api_v1_str.clone(),
    };

    Json(response)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut components = HashMap::new();

    let tables = state.db().read().await;
    components.insert(
        "store".to_string(),
        format!(
            "healthy: {} units, {} sub-units, {} lessons, {} exercises",
            tables.units.len(),
            tables.sub_units.len(),
            tables.lessons.len(),
            tables.exercises.len()
        ),
    );
    drop(tables);

    let latency = match state.db().latency() {
        Latency::None => "none".to_string(),
        Latency::Fixed(delay) => format!("fixed {}ms", delay.as_millis()),
        Latency::Jitter { min, max } => format!("jitter {}-{}ms", min.as_millis(), max.as_millis()),
    };
    components.insert("latency".to_string(), latency);

    Json(HealthResponse { service: "curricula-api".to_string(), status: "healthy".to_string(), components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
