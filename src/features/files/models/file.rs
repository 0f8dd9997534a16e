use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for uploaded file metadata
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
    pub upload_date: DateTime<Utc>,
}

/// Values supplied when inserting a row; `upload_date` is set by the database
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
}
