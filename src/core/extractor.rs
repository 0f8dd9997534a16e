use axum::extract::multipart::{MultipartError, MultipartRejection};

use crate::core::error::AppError;

// Multipart failures render as `{"error": ...}` 400s instead of axum's plain-text rejections.

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(format!("Invalid multipart request: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("Failed to read multipart data: {}", err.body_text()))
    }
}
