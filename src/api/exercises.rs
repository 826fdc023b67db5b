use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::types::ContentField;
use crate::repositories;
use crate::schemas::exercise::{
    ExerciseCreate, ExerciseDraftRequest, ExerciseDraftResponse, ExerciseFormResponse,
    ExerciseResponse, ExerciseUpdate, NextOrderResponse, ReorderRequest,
};
use crate::schemas::{ApiResponse, DeleteResponse};
use crate::services::content_adapter;
use crate::services::validation::{self, is_blank, FieldErrors};

#[cfg(test)]
mod tests;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/draft", post(retype_draft))
        .route(
            "/:exercise_id",
            get(get_exercise).patch(update_exercise).delete(delete_exercise),
        )
        .route("/:exercise_id/form", get(get_form))
        .route("/:exercise_id/options/:index", delete(remove_option))
}

fn clean_hints(hints: Option<String>) -> Option<String> {
    hints.filter(|hints| !is_blank(hints))
}

pub(crate) async fn list_for_lesson(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExerciseResponse>>>, ApiError> {
    repositories::lessons::fetch_one_by_id(state.db(), &lesson_id).await?;
    let exercises = repositories::exercises::list_for_lesson(state.db(), &lesson_id).await;
    Ok(Json(ApiResponse::ok(exercises.into_iter().map(ExerciseResponse::from_db).collect())))
}

pub(crate) async fn create_under_lesson(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ExerciseCreate>,
) -> Result<(StatusCode, Json<ApiResponse<ExerciseResponse>>), ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let lesson = repositories::lessons::fetch_one_by_id(db, &lesson_id).await?;
    let siblings = repositories::exercises::list_for_lesson(db, &lesson_id).await;

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    validation::check_parent("unitId", payload.unit_id.as_deref(), &lesson.unit_id, &mut errors);
    validation::check_parent(
        "subUnitId",
        payload.sub_unit_id.as_deref(),
        &lesson.sub_unit_id,
        &mut errors,
    );
    validation::check_parent("lessonId", payload.lesson_id.as_deref(), &lesson_id, &mut errors);
    let order = validation::check_sibling_order(&payload.order, &siblings, None, &mut errors);
    let exercise_type = validation::require_type(payload.exercise_type.as_ref(), &mut errors);
    if let Some(exercise_type) = exercise_type {
        validation::check_exercise_content(exercise_type, &payload.content, &mut errors);
    }
    let (order, exercise_type) = errors.finish_with(order.zip(exercise_type))?;

    let title = content_adapter::default_title(&payload.title, &payload.instruction);
    let hints = clean_hints(payload.hints);
    let exercise = repositories::exercises::create(
        db,
        repositories::exercises::CreateExercise {
            lesson_id: &lesson_id,
            title: &title,
            order,
            instruction: &payload.instruction,
            hints: hints.as_deref(),
            content: content_adapter::to_content(exercise_type, &payload.content),
        },
    )
    .await?;

    tracing::info!(
        exercise_id = %exercise.id,
        lesson_id = %lesson_id,
        exercise_type = exercise_type.as_str(),
        action = "create",
        "Exercise saved"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ExerciseResponse::from_db(exercise)).with_message("Exercise created")),
    ))
}

pub(crate) async fn next_order(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<NextOrderResponse>>, ApiError> {
    repositories::lessons::fetch_one_by_id(state.db(), &lesson_id).await?;
    let exercises = repositories::exercises::list_for_lesson(state.db(), &lesson_id).await;
    let next_order = validation::suggest_next_order(exercises.iter().map(|exercise| exercise.order));
    Ok(Json(ApiResponse::ok(NextOrderResponse { lesson_id, next_order })))
}

pub(crate) async fn reorder(
    Path(lesson_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<ApiResponse<Vec<ExerciseResponse>>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let reordered =
        repositories::exercises::reorder(db, &lesson_id, &payload.exercise_ids).await?;

    tracing::info!(lesson_id = %lesson_id, count = reordered.len(), "Exercises reordered");
    Ok(Json(
        ApiResponse::ok(reordered.into_iter().map(ExerciseResponse::from_db).collect::<Vec<_>>())
            .with_message("Exercises reordered"),
    ))
}

async fn get_exercise(
    Path(exercise_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ExerciseResponse>>, ApiError> {
    let exercise = repositories::exercises::fetch_one_by_id(state.db(), &exercise_id).await?;
    Ok(Json(ApiResponse::ok(ExerciseResponse::from_db(exercise))))
}

async fn get_form(
    Path(exercise_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ExerciseFormResponse>>, ApiError> {
    let exercise = repositories::exercises::fetch_one_by_id(state.db(), &exercise_id).await?;
    let response = ExerciseFormResponse {
        exercise_type: exercise.exercise_type(),
        content: content_adapter::from_content(&exercise.content),
        id: exercise.id,
        title: exercise.title,
        order: exercise.order,
        instruction: exercise.instruction,
        hints: exercise.hints.unwrap_or_default(),
    };
    Ok(Json(ApiResponse::ok(response)))
}

async fn update_exercise(
    Path(exercise_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ExerciseUpdate>,
) -> Result<Json<ApiResponse<ExerciseResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let existing = repositories::exercises::fetch_one_by_id(db, &exercise_id).await?;
    let exercise_type = existing.exercise_type();

    let mut errors = FieldErrors::new();
    validation::collect(&payload, &mut errors);
    validation::check_unchanged("unitId", payload.unit_id.as_deref(), &existing.unit_id, &mut errors);
    validation::check_unchanged(
        "subUnitId",
        payload.sub_unit_id.as_deref(),
        &existing.sub_unit_id,
        &mut errors,
    );
    validation::check_unchanged(
        "lessonId",
        payload.lesson_id.as_deref(),
        &existing.lesson_id,
        &mut errors,
    );
    validation::check_type_unchanged(payload.exercise_type.as_ref(), exercise_type, &mut errors);
    let mut order = None;
    if let Some(input) = payload.order.as_ref() {
        let siblings = repositories::exercises::list_for_lesson(db, &existing.lesson_id).await;
        order = validation::check_sibling_order(input, &siblings, Some(&exercise_id), &mut errors);
    }
    if let Some(form) = payload.content.as_ref() {
        validation::check_exercise_content(exercise_type, form, &mut errors);
    }
    errors.finish(())?;

    let instruction = payload.instruction.as_deref().unwrap_or(&existing.instruction);
    let title = payload.title.as_deref().map(|title| content_adapter::default_title(title, instruction));
    let content = payload.content.as_ref().map(|form| content_adapter::to_content(exercise_type, form));
    let exercise = repositories::exercises::update(
        db,
        &exercise_id,
        repositories::exercises::UpdateExercise {
            title,
            order,
            instruction: payload.instruction.clone(),
            hints: payload.hints.map(|hints| clean_hints(Some(hints))),
            content,
        },
    )
    .await?;

    tracing::info!(exercise_id = %exercise.id, action = "update", "Exercise saved");
    Ok(Json(ApiResponse::ok(ExerciseResponse::from_db(exercise)).with_message("Exercise updated")))
}

async fn delete_exercise(
    Path(exercise_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let removed = repositories::exercises::delete(db, &exercise_id).await?;

    tracing::info!(exercise_id = %exercise_id, "Exercise deleted");
    Ok(Json(ApiResponse::ok(DeleteResponse { removed }).with_message("Exercise deleted")))
}

/// Drops one answer option from a stored exercise and renumbers the rest.
async fn remove_option(
    Path((exercise_id, index)): Path<(String, usize)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ExerciseResponse>>, ApiError> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    let existing = repositories::exercises::fetch_one_by_id(db, &exercise_id).await?;
    let exercise_type = existing.exercise_type();
    if !exercise_type.allows(ContentField::Options) {
        return Err(ApiError::BadRequest(format!(
            "{} exercises have no options",
            exercise_type.as_str()
        )));
    }

    let mut form = content_adapter::from_content(&existing.content);
    if !content_adapter::remove_option(&mut form, index) {
        return Err(ApiError::NotFound(format!("Option {index} not found on {exercise_id}")));
    }

    let mut errors = FieldErrors::new();
    validation::check_exercise_content(exercise_type, &form, &mut errors);
    errors.finish(())?;

    let exercise = repositories::exercises::update(
        db,
        &exercise_id,
        repositories::exercises::UpdateExercise {
            content: Some(content_adapter::to_content(exercise_type, &form)),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(exercise_id = %exercise.id, index, "Exercise option removed");
    Ok(Json(ApiResponse::ok(ExerciseResponse::from_db(exercise)).with_message("Option removed")))
}

/// Re-targets an unsaved form at `type`, clearing the fields that type does not carry.
async fn retype_draft(
    Json(payload): Json<ExerciseDraftRequest>,
) -> Json<ApiResponse<ExerciseDraftResponse>> {
    let content = content_adapter::retain_for_type(payload.exercise_type, payload.content);
    Json(ApiResponse::ok(ExerciseDraftResponse { exercise_type: payload.exercise_type, content }))
}
