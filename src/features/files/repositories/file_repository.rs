use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::files::models::{FileRecord, NewFileRecord};

/// Persistence for file metadata rows
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert(&self, file: NewFileRecord) -> Result<FileRecord, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// Remove the row; deleting an id that does not exist is not an error
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn insert(&self, file: NewFileRecord) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (id, file_name, url)
            VALUES ($1, $2, $3)
            RETURNING id, file_name, url, upload_date
            "#,
        )
        .bind(file.id)
        .bind(&file.file_name)
        .bind(&file.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let row = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, file_name, url, upload_date
            FROM files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
