use abbr_core::{CoreError, StorageError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] CoreError),
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short name is already in use: {0}")]
    Conflict(String),
    #[error("short name not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AppError::Body(rejection) => rejection.status(),
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidUrl(_) => "validation_error",
            AppError::Body(_) => "invalid_body",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Storage(_) => "storage_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Storage(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "storage failure while handling request");
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
