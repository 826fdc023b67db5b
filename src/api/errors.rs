use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::repositories::StoreError;
use crate::schemas::ApiResponse;
use crate::services::validation::FieldErrors;

#[derive(Debug)]
pub(crate) enum ApiError {
    Validation(FieldErrors),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::InvalidArgument { .. } => ApiError::BadRequest(err.to_string()),
            StoreError::HasChildren { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                tracing::warn!(count = errors.len(), fields = ?errors.messages(), "Validation failed");
                let mut body = ApiResponse::failure("Validation failed");
                body.errors = Some(errors.messages());
                body.details = Some(errors.into_details());
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::BadRequest(message) => {
                tracing::warn!(error = %message, "Bad request");
                (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(message))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ApiResponse::failure(message))).into_response()
            }
            ApiError::Conflict(message) => {
                tracing::warn!(error = %message, "Conflict");
                (StatusCode::CONFLICT, Json(ApiResponse::failure(message))).into_response()
            }
        }
    }
}
