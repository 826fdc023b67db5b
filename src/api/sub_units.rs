use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::lessons;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::sub_unit::{SubUnitCreate, SubUnitResponse, SubUnitUpdate};
use crate::schemas::{ApiResponse, DeleteQuery, DeleteResponse};
use crate::services::validation::{self, FieldErrors};

#[cfg(test)]
mod tests;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:sub_unit_id", get(get_sub_unit).patch(update_sub_unit).delete(delete_sub_unit))
        .route(
            "/:sub_unit_id/lessons",
            get(lessons::list_for_sub_unit).post(lessons::create_under_sub_unit),
        )
}

pub(crate) async fn list_for_unit(
    Path(unit_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SubUnitResponse>>>, ApiError> {
    repositories::units::fetch_one_by_id(state.db(), &unit_id).await?;
    let sub_units = repositories::sub_units::list_for_unit(state.db(), &unit_id).await;
    Ok(Json(ApiResponse::ok(sub_units.into_iter().map(SubUnitResponse::from_db).collect())))
}

pub(crate) async fn create_under_unit(
    Path(unit_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SubUnitCreate>,
) -> Result<(StatusCode, Json<ApiResponse<SubUnitResponse>>), ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    repositories::units::fetch_one_by_id(db, &unit_id).await?;
    let siblings = repositories::sub_units::list_for_unit(db, &unit_id).await;

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    validation::check_parent("unitId", payload.unit_id.as_deref(), &unit_id, &mut errors);
    let order = validation::check_sibling_order(&payload.order, &siblings, None, &mut errors);
    let order = errors.finish_with(order)?;

    let sub_unit = repositories::sub_units::create(
        db,
        repositories::sub_units::CreateSubUnit {
            unit_id: &unit_id,
            title: &payload.title,
            theme: &payload.theme,
            order,
            estimated_total_time: payload.estimated_total_time,
        },
    )
    .await?;

    tracing::info!(sub_unit_id = %sub_unit.id, unit_id = %unit_id, action = "create", "Sub-unit saved");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SubUnitResponse::from_db(sub_unit)).with_message("Sub-unit created")),
    ))
}

async fn get_sub_unit(
    Path(sub_unit_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SubUnitResponse>>, ApiError> {
    let sub_unit = repositories::sub_units::fetch_one_by_id(state.db(), &sub_unit_id).await?;
    Ok(Json(ApiResponse::ok(SubUnitResponse::from_db(sub_unit))))
}

async fn update_sub_unit(
    Path(sub_unit_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SubUnitUpdate>,
) -> Result<Json<ApiResponse<SubUnitResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let existing = repositories::sub_units::fetch_one_by_id(db, &sub_unit_id).await?;

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    validation::check_unchanged("unitId", payload.unit_id.as_deref(), &existing.unit_id, &mut errors);
    let mut order = None;
    if let Some(input) = payload.order.as_ref() {
        let siblings = repositories::sub_units::list_for_unit(db, &existing.unit_id).await;
        order = validation::check_sibling_order(input, &siblings, Some(&sub_unit_id), &mut errors);
    }
    errors.finish(())?;

    let sub_unit = repositories::sub_units::update(
        db,
        &sub_unit_id,
        repositories::sub_units::UpdateSubUnit {
            title: payload.title,
            theme: payload.theme,
            order,
            estimated_total_time: payload.estimated_total_time,
        },
    )
    .await?;

    tracing::info!(sub_unit_id = %sub_unit.id, action = "update", "Sub-unit saved");
    Ok(Json(ApiResponse::ok(SubUnitResponse::from_db(sub_unit)).with_message("Sub-unit updated")))
}

async fn delete_sub_unit(
    Path(sub_unit_id): Path<String>,
    Query(query): Query<DeleteQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let removed = repositories::sub_units::delete(db, &sub_unit_id, query.mode()).await?;

    tracing::info!(sub_unit_id = %sub_unit_id, removed, cascade = query.cascade, "Sub-unit deleted");
    Ok(Json(ApiResponse::ok(DeleteResponse { removed }).with_message("Sub-unit deleted")))
}
