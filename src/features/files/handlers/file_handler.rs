use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        Path, State,
    },
    http::{Method, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::metrics::RequestTimer;
use crate::features::files::dtos::{FileResponseDto, FileUpload, UploadFileDto};
use crate::features::files::services::FileService;
use crate::shared::constants::{
    BAD_REQUEST_MESSAGE, DEFAULT_CONTENT_TYPE, NOT_FOUND_MESSAGE, ROUTE_FILES, ROUTE_FILE_BY_ID,
};
use crate::shared::types::ErrorResponse;

/// Upload a file
///
/// Accepts multipart/form-data with exactly one part carrying a filename.
/// The part may use any field name; other non-file fields are ignored.
#[utoipa::path(
    post,
    path = "/file",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "A single non-empty file part",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = FileResponseDto),
        (status = 400, description = "Invalid upload or failed write", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let timer = RequestTimer::start(ROUTE_FILES);
    timer.complete(create_file(&service, multipart).await)
}

async fn create_file(
    service: &FileService,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<FileResponseDto>)> {
    let upload = read_upload(multipart?).await?;

    debug!(
        "Received upload: name={}, content_type={}, size={}",
        upload.file_name,
        upload.content_type,
        upload.data.len()
    );

    let file = service.upload_file(upload).await?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// Pull the single file part out of a multipart body
async fn read_upload(mut multipart: Multipart) -> Result<FileUpload> {
    let mut upload: Option<FileUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if upload.is_some() {
            return Err(AppError::BadRequest(
                "Only one file may be uploaded per request".to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let data = field.bytes().await?;

        upload = Some(FileUpload {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if upload.data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    Ok(upload)
}

/// Get file metadata by id
#[utoipa::path(
    get,
    path = "/file/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File id (UUID)")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileResponseDto),
        (status = 404, description = "Unknown or malformed id", body = ErrorResponse)
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Response {
    let timer = RequestTimer::start(ROUTE_FILE_BY_ID);

    let result = match parse_file_id(&id) {
        Ok(id) => service.get_file(id).await.map(Json),
        Err(e) => Err(e),
    };

    timer.complete(result)
}

/// Delete a file and its metadata
#[utoipa::path(
    delete,
    path = "/file/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File id (UUID)")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "Unknown or malformed id", body = ErrorResponse),
        (status = 500, description = "Object storage delete failed", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Response {
    let timer = RequestTimer::start(ROUTE_FILE_BY_ID);

    let result = match parse_file_id(&id) {
        Ok(id) => service
            .delete_file(id)
            .await
            .map(|()| StatusCode::NO_CONTENT),
        Err(e) => Err(e),
    };

    timer.complete(result)
}

/// GET and DELETE on the collection need an id
pub async fn reject_missing_id(method: Method) -> Response {
    let timer = RequestTimer::start(ROUTE_FILES);
    debug!("Rejecting {} on {} without an id", method, ROUTE_FILES);

    timer.complete::<StatusCode>(Err(AppError::BadRequest(BAD_REQUEST_MESSAGE.to_string())))
}

pub async fn collection_method_not_allowed() -> Response {
    RequestTimer::start(ROUTE_FILES).complete::<StatusCode>(Err(AppError::MethodNotAllowed))
}

pub async fn item_method_not_allowed() -> Response {
    RequestTimer::start(ROUTE_FILE_BY_ID).complete::<StatusCode>(Err(AppError::MethodNotAllowed))
}

/// Malformed ids can never match a row, so they read as not found
fn parse_file_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}
