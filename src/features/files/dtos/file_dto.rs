use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::FileRecord;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler accepts exactly one part carrying a filename, under any field name.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload (any part name, e.g. `profilePic`)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// File metadata returned by create and read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Unique identifier for the file
    pub id: Uuid,
    /// Original filename as uploaded
    pub file_name: String,
    /// Object-storage URL of the file
    pub url: String,
    /// Timestamp when the file was uploaded
    pub upload_date: DateTime<Utc>,
}

impl From<FileRecord> for FileResponseDto {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id,
            file_name: file.file_name,
            url: file.url,
            upload_date: file.upload_date,
        }
    }
}

/// A file read out of a multipart request
#[derive(Debug)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Slack on top of the upload size for multipart boundaries and headers
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;
