use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::sub_units;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::unit::{UnitCreate, UnitResponse, UnitUpdate};
use crate::schemas::{ApiResponse, DeleteQuery, DeleteResponse};
use crate::services::validation::{self, is_blank, FieldErrors};

#[cfg(test)]
mod tests;

fn clean_optional(value: Option<String>) -> Option<String> {
    value.filter(|value| !is_blank(value))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_units).post(create_unit))
        .route("/:unit_id", get(get_unit).patch(update_unit).delete(delete_unit))
        .route(
            "/:unit_id/sub-units",
            get(sub_units::list_for_unit).post(sub_units::create_under_unit),
        )
}

async fn list_units(State(state): State<AppState>) -> Json<ApiResponse<Vec<UnitResponse>>> {
    let units = repositories::units::list(state.db()).await;
    Json(ApiResponse::ok(units.into_iter().map(UnitResponse::from_db).collect()))
}

async fn get_unit(
    Path(unit_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UnitResponse>>, ApiError> {
    let unit = repositories::units::fetch_one_by_id(state.db(), &unit_id).await?;
    Ok(Json(ApiResponse::ok(UnitResponse::from_db(unit))))
}

async fn create_unit(
    State(state): State<AppState>,
    Json(payload): Json<UnitCreate>,
) -> Result<(StatusCode, Json<ApiResponse<UnitResponse>>), ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let siblings = repositories::units::list(db).await;
    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    let order = validation::check_sibling_order(&payload.order, &siblings, None, &mut errors);
    let order = errors.finish_with(order)?;

    let unit = repositories::units::create(
        db,
        repositories::units::CreateUnit {
            title: &payload.title,
            order,
            description: payload.description.as_deref().filter(|value| !is_blank(value)),
            thumbnail_url: payload.thumbnail_url.as_deref().filter(|value| !is_blank(value)),
            is_published: payload.is_published,
        },
    )
    .await;

    tracing::info!(unit_id = %unit.id, action = "create", "Unit saved");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UnitResponse::from_db(unit)).with_message("Unit created")),
    ))
}

async fn update_unit(
    Path(unit_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UnitUpdate>,
) -> Result<Json<ApiResponse<UnitResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    repositories::units::fetch_one_by_id(db, &unit_id).await?;

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    let mut order = None;
    if let Some(input) = payload.order.as_ref() {
        let siblings = repositories::units::list(db).await;
        order = validation::check_sibling_order(input, &siblings, Some(&unit_id), &mut errors);
    }
    errors.finish(())?;

    let unit = repositories::units::update(
        db,
        &unit_id,
        repositories::units::UpdateUnit {
            title: payload.title,
            order,
            description: payload.description.map(clean_optional),
            thumbnail_url: payload.thumbnail_url.map(clean_optional),
            is_published: payload.is_published,
        },
    )
    .await?;

    tracing::info!(unit_id = %unit.id, action = "update", "Unit saved");
    Ok(Json(ApiResponse::ok(UnitResponse::from_db(unit)).with_message("Unit updated")))
}

async fn delete_unit(
    Path(unit_id): Path<String>,
    Query(query): Query<DeleteQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let removed = repositories::units::delete(db, &unit_id, query.mode()).await?;

    tracing::info!(unit_id = %unit_id, removed, cascade = query.cascade, "Unit deleted");
    Ok(Json(ApiResponse::ok(DeleteResponse { removed }).with_message("Unit deleted")))
}
