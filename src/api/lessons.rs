use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::exercises;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::lesson::{clean_objectives, LessonCreate, LessonResponse, LessonUpdate};
use crate::schemas::{ApiResponse, DeleteQuery, DeleteResponse};
use crate::services::validation::{self, FieldErrors};


pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:lesson_id", get(get_lesson).patch(update_lesson).delete(delete_lesson))
        .route(
            "/:lesson_id/exercises",
            get(exercises::list_for_lesson).post(exercises::create_under_lesson),
        )
        .route("/:lesson_id/exercises/next-order", get(exercises::next_order))
        .route("/:lesson_id/exercises/reorder", put(exercises::reorder))
}

pub(crate) async fn list_for_sub_unit(
    Path(sub_unit_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LessonResponse>>>, ApiError> {
    repositories::sub_units::fetch_one_by_id(state.db(), &sub_unit_id).await?;
    let lessons = repositories::lessons::list_for_sub_unit(state.db(), &sub_unit_id).await;
    Ok(Json(ApiResponse::ok(lessons.into_iter().map(LessonResponse::from_db).collect())))
}

pub(crate) async fn create_under_sub_unit(
    Path(sub_unit_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> Result<(StatusCode, Json<ApiResponse<LessonResponse>>), ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let sub_unit = repositories::sub_units::fetch_one_by_id(db, &sub_unit_id).await?;
    let siblings = repositories::lessons::list_for_sub_unit(db, &sub_unit_id).await;

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    validation::check_parent("unitId", payload.unit_id.as_deref(), &sub_unit.unit_id, &mut errors);
    validation::check_parent(
        "subUnitId",
        payload.sub_unit_id.as_deref(),
        &sub_unit_id,
        &mut errors,
    );
    let order = validation::check_sibling_order(&payload.order, &siblings, None, &mut errors);
    let order = errors.finish_with(order)?;

    let lesson = repositories::lessons::create(
        db,
        repositories::lessons::CreateLesson {
            sub_unit_id: &sub_unit_id,
            title: &payload.title,
            order,
            estimated_time: payload.estimated_time,
            objectives: clean_objectives(payload.objectives),
        },
    )
    .await?;

    tracing::info!(lesson_id = %lesson.id, sub_unit_id = %sub_unit_id, action = "create", "Lesson saved");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LessonResponse::from_db(lesson)).with_message("Lesson created")),
    ))
}

async fn get_lesson(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LessonResponse>>, ApiError> {
    let lesson = repositories::lessons::fetch_one_by_id(state.db(), &lesson_id).await?;
    Ok(Json(ApiResponse::ok(LessonResponse::from_db(lesson))))
}

async fn update_lesson(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<LessonUpdate>,
) -> Result<Json<ApiResponse<LessonResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let existing = repositories::lessons::fetch_one_by_id(db, &lesson_id).await?;

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    validation::check_unchanged("unitId", payload.unit_id.as_deref(), &existing.unit_id, &mut errors);
    validation::check_unchanged(
        "subUnitId",
        payload.sub_unit_id.as_deref(),
        &existing.sub_unit_id,
        &mut errors,
    );
    let mut order = None;
    if let Some(input) = payload.order.as_ref() {
        let siblings = repositories::lessons::list_for_sub_unit(db, &existing.sub_unit_id).await;
        order = validation::check_sibling_order(input, &siblings, Some(&lesson_id), &mut errors);
    }
    errors.finish(())?;

    let lesson = repositories::lessons::update(
        db,
        &lesson_id,
        repositories::lessons::UpdateLesson {
            title: payload.title,
            order,
            estimated_time: payload.estimated_time,
            objectives: payload.objectives.map(clean_objectives),
        },
    )
    .await?;

    tracing::info!(lesson_id = %lesson.id, action = "update", "Lesson saved");
    Ok(Json(ApiResponse::ok(LessonResponse::from_db(lesson)).with_message("Lesson updated")))
}

async fn delete_lesson(
    Path(lesson_id): Path<String>,
    Query(query): Query<DeleteQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let removed = repositories::lessons::delete(db, &lesson_id, query.mode()).await?;

    tracing::info!(lesson_id = %lesson_id, removed, cascade = query.cascade, "Lesson deleted");
    Ok(Json(ApiResponse::ok(DeleteResponse { removed }).with_message("Lesson deleted")))
}
