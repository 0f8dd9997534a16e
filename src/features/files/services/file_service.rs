use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::metrics::{time_dependency, DEP_DATABASE, DEP_OBJECT_STORE};
use crate::features::files::dtos::{FileResponseDto, FileUpload};
use crate::features::files::models::NewFileRecord;
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{NOT_FOUND_MESSAGE, ROUTE_FILES, ROUTE_FILE_BY_ID};

/// Service for file operations
///
/// Bytes live in object storage and metadata in the `files` table. The two
/// writes are not transactional: an object is written before its row and
/// deleted before its row.
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl FileService {
    pub fn new(repository: Arc<dyn FileRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Upload a file to storage and save its metadata
    ///
    /// Any storage or database failure is reported as
    /// [`AppError::UploadFailed`]. A failed insert leaves the object behind.
    pub async fn upload_file(&self, upload: FileUpload) -> Result<FileResponseDto> {
        let id = Uuid::new_v4();
        let key = build_object_key(id, Utc::now().timestamp_millis(), &upload.file_name);

        time_dependency(
            ROUTE_FILES,
            DEP_OBJECT_STORE,
            self.storage.upload(&key, upload.data, &upload.content_type),
        )
        .await
        .map_err(AppError::upload_failed)?;

        debug!("File uploaded to object storage: {}", key);

        let url = self.storage.object_url(&key);
        let new_file = NewFileRecord {
            id,
            file_name: upload.file_name,
            url,
        };

        let file = time_dependency(ROUTE_FILES, DEP_DATABASE, self.repository.insert(new_file))
            .await
            .map_err(AppError::upload_failed)?;

        info!("File metadata saved: id={}, key={}", file.id, key);

        Ok(file.into())
    }

    /// Look up file metadata by id
    pub async fn get_file(&self, id: Uuid) -> Result<FileResponseDto> {
        let file = time_dependency(ROUTE_FILE_BY_ID, DEP_DATABASE, self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        Ok(file.into())
    }

    /// Delete the stored object, then the metadata row
    ///
    /// A storage failure aborts before the row is touched and is not retried.
    pub async fn delete_file(&self, id: Uuid) -> Result<()> {
        let file = time_dependency(ROUTE_FILE_BY_ID, DEP_DATABASE, self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        let key = self.storage.key_from_url(&file.url).ok_or_else(|| {
            AppError::Internal(format!(
                "Stored URL '{}' does not point into the configured bucket",
                file.url
            ))
        })?;

        time_dependency(ROUTE_FILE_BY_ID, DEP_OBJECT_STORE, self.storage.delete(&key)).await?;

        debug!("File deleted from object storage: {}", key);

        time_dependency(ROUTE_FILE_BY_ID, DEP_DATABASE, self.repository.delete(file.id)).await?;

        info!("File deleted: id={}, key={}", file.id, key);

        Ok(())
    }
}

/// Object key for an upload: `{id}/{epoch_millis}-{file name}`
///
/// The record id keeps keys unique even for identical names uploaded in the
/// same millisecond. Only the last path component of the client-supplied
/// name is used.
pub fn build_object_key(id: Uuid, epoch_millis: i64, file_name: &str) -> String {
    let base_name = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("unnamed");

    format!("{}/{}-{}", id, epoch_millis, base_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{InMemoryFileRepository, InMemoryObjectStorage};

    fn upload(name: &str, data: &[u8]) -> FileUpload {
        FileUpload {
            file_name: name.to_string(),
            content_type: "text/plain".to_string(),
            data: data.to_vec(),
        }
    }

    fn service(
        repository: &Arc<InMemoryFileRepository>,
        storage: &Arc<InMemoryObjectStorage>,
    ) -> FileService {
        FileService::new(repository.clone(), storage.clone())
    }

    #[test]
    fn test_build_object_key() {
        let id = Uuid::nil();
        assert_eq!(
            build_object_key(id, 1700000000000, "a.txt"),
            "00000000-0000-0000-0000-000000000000/1700000000000-a.txt"
        );
    }

    #[test]
    fn test_build_object_key_strips_client_paths() {
        let id = Uuid::nil();
        assert!(build_object_key(id, 1, "C:\\Users\\me\\photo.png").ends_with("/1-photo.png"));
        assert!(build_object_key(id, 1, "../../etc/passwd").ends_with("/1-passwd"));
        assert!(build_object_key(id, 1, "dir/").ends_with("/1-unnamed"));
    }

    #[test]
    fn test_build_object_key_is_unique_per_id() {
        let a = build_object_key(Uuid::new_v4(), 42, "a.txt");
        let b = build_object_key(Uuid::new_v4(), 42, "a.txt");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_upload_writes_object_then_row() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());

        let file = service(&repository, &storage)
            .upload_file(upload("a.txt", b"0123456789"))
            .await
            .unwrap();

        assert_eq!(file.file_name, "a.txt");
        let key = storage.key_from_url(&file.url).unwrap();
        assert_eq!(storage.object(&key), Some((b"0123456789".to_vec(), "text/plain".to_string())));
        assert!(key.starts_with(&format!("{}/", file.id)));
        assert!(file.url.ends_with("-a.txt"));
        assert_eq!(repository.get(file.id).map(|row| row.url), Some(file.url));
    }

    #[tokio::test]
    async fn test_upload_storage_failure_creates_no_row() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());
        storage.fail_uploads();

        let err = service(&repository, &storage)
            .upload_file(upload("a.txt", b"data"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UploadFailed(_)));
        assert_eq!(repository.row_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_insert_failure_leaves_object() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());
        repository.fail_inserts();

        let err = service(&repository, &storage)
            .upload_file(upload("a.txt", b"data"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UploadFailed(_)));
        assert_eq!(storage.object_count(), 1);
        assert_eq!(repository.row_count(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_file_is_not_found() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());

        let err = service(&repository, &storage)
            .get_file(Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Not found"));
    }

    #[tokio::test]
    async fn test_delete_removes_object_and_row() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());
        let service = service(&repository, &storage);

        let file = service.upload_file(upload("a.txt", b"data")).await.unwrap();
        service.delete_file(file.id).await.unwrap();

        assert_eq!(storage.object_count(), 0);
        assert_eq!(repository.row_count(), 0);
        assert!(matches!(
            service.get_file(file.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_storage_failure_keeps_row() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());
        let service = service(&repository, &storage);

        let file = service.upload_file(upload("a.txt", b"data")).await.unwrap();
        storage.fail_deletes();

        let err = service.delete_file(file.id).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(repository.row_count(), 1);
        assert_eq!(storage.object_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_file_has_no_side_effects() {
        let repository = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryObjectStorage::default());

        let err = service(&repository, &storage)
            .delete_file(Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(storage.delete_calls(), 0);
    }
}
