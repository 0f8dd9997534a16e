//! In-memory stand-ins for the database and object store, plus metric capture

use async_trait::async_trait;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::core::metrics::HTTP_REQUESTS_TOTAL;
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::repositories::FileRepository;
use crate::features::health::models::HealthCheck;
use crate::features::health::repositories::HealthRepository;
use crate::modules::storage::ObjectStorage;

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[derive(Default)]
pub struct InMemoryHealthRepository {
    fail: bool,
    attempts: AtomicUsize,
    next_id: AtomicI32,
    rows: Mutex<Vec<HealthCheck>>,
}

impl InMemoryHealthRepository {
    /// A repository whose every insert fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn insert_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl HealthRepository for InMemoryHealthRepository {
    async fn insert(&self) -> Result<HealthCheck, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unavailable());
        }

        let row = HealthCheck {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            datetime: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());

        Ok(row)
    }
}

#[derive(Default)]
pub struct InMemoryFileRepository {
    fail_inserts: AtomicBool,
    rows: Mutex<HashMap<Uuid, FileRecord>>,
}

impl InMemoryFileRepository {
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<FileRecord> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn insert(&self, file: NewFileRecord) -> Result<FileRecord, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let row = FileRecord {
            id: file.id,
            file_name: file.file_name,
            url: file.url,
            upload_date: Utc::now(),
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());

        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        Ok(self.get(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }
}

pub struct InMemoryObjectStorage {
    url_base: String,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
    delete_calls: AtomicUsize,
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self {
            url_base: "https://test-bucket.s3.us-east-1.amazonaws.com".to_string(),
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            delete_calls: AtomicUsize::new(0),
            objects: Mutex::new(HashMap::new()),
        }
    }
}

impl InMemoryObjectStorage {
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Bytes and content type stored under `key`
    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("Failed to upload '{}'", key)));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("Failed to delete '{}'", key)));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn url_base(&self) -> &str {
        &self.url_base
    }
}

/// Run `scenario` on a single-threaded runtime with a Prometheus recorder
/// installed for this thread only, returning the rendered exposition text
pub fn capture_metrics<F, Fut>(scenario: F) -> String
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(scenario())
    });

    handle.render()
}

/// Request counter value for `route` and `outcome` in rendered metrics
pub fn request_count(rendered: &str, route: &str, outcome: &str) -> Option<u64> {
    let route = format!("route=\"{}\"", route);
    let outcome = format!("outcome=\"{}\"", outcome);

    rendered
        .lines()
        .filter(|line| line.starts_with(&format!("{}{{", HTTP_REQUESTS_TOTAL)))
        .find(|line| line.contains(&route) && line.contains(&outcome))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}
