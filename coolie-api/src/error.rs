use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use coolie_core::{CoreError, TranslationError};

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    /// An external collaborator failed; its message is passed to the caller.
    ServiceError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ServiceError(msg) => {
                tracing::warn!("Service Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<TranslationError> for AppError {
    fn from(err: TranslationError) -> Self {
        AppError::ServiceError(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for AppError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
