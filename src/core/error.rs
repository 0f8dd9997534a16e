use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::core::metrics::Outcome;
use crate::shared::constants::{METHOD_NOT_ALLOWED_MESSAGE, UPLOAD_FAILED_MESSAGE};
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{}", METHOD_NOT_ALLOWED_MESSAGE)]
    MethodNotAllowed,

    /// A dependency failed while creating a file; reported to the client as a
    /// 400 with a fixed message, the cause is only logged
    #[error("{0}")]
    UploadFailed(Box<AppError>),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Metrics outcome label for this error
    pub fn outcome(&self) -> Outcome {
        match self {
            AppError::Database(_) => Outcome::DbFailure,
            AppError::Storage(_) => Outcome::StorageFailure,
            AppError::NotFound(_) => Outcome::NotFound,
            AppError::BadRequest(_) => Outcome::BadRequest,
            AppError::MethodNotAllowed => Outcome::MethodNotAllowed,
            AppError::UploadFailed(inner) => inner.outcome(),
            AppError::Internal(_) => Outcome::InternalError,
        }
    }

    pub fn upload_failed(source: AppError) -> Self {
        AppError::UploadFailed(Box::new(source))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            ),
            AppError::UploadFailed(ref inner) => {
                tracing::warn!("File upload failed: {}", inner);
                (StatusCode::BAD_REQUEST, UPLOAD_FAILED_MESSAGE.to_string())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
