//! S3-compatible storage client
//!
//! Uses rust-s3 for bucket operations. Targets AWS S3 by default; a custom
//! endpoint (MinIO, LocalStack) switches the bucket to path-style addressing.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;
use crate::modules::storage::ObjectStorage;

/// S3 bucket client shared by all requests
pub struct S3Client {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    url_base: String,
    custom_endpoint: bool,
}

impl S3Client {
    /// Create a new client from configuration
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to load S3 credentials: {}", e)))?;

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| AppError::Internal(format!("Invalid AWS region: {}", e)))?,
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create S3 bucket handle: {}", e)))?;

        // MinIO and friends expect http://endpoint/bucket rather than http://bucket.endpoint
        if config.endpoint.is_some() {
            bucket.set_path_style();
        }

        let client = Self {
            bucket,
            region,
            credentials,
            url_base: config.object_url_base(),
            custom_endpoint: config.endpoint.is_some(),
        };

        info!(
            "S3 client initialized for bucket: {}, region: {}, url base: {}",
            client.bucket.name(),
            config.region,
            client.url_base
        );

        Ok(client)
    }

    /// Create the bucket on custom endpoints when it is missing
    ///
    /// AWS buckets are provisioned out of band and are left untouched.
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        if !self.custom_endpoint {
            return Ok(());
        }

        let exists = self.bucket.exists().await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to check bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        if exists {
            debug!("Bucket '{}' already exists", self.bucket.name());
            return Ok(());
        }

        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| {
            AppError::Storage(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        info!("Bucket '{}' created", self.bucket.name());
        Ok(())
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

fn check_status(status: u16, action: &str, key: &str) -> Result<(), AppError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AppError::Storage(format!(
            "Failed to {} '{}': S3 responded with status {}",
            action, key, status
        )))
    }
}

#[async_trait]
impl ObjectStorage for S3Client {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload file '{}': {}", key, e)))?;
        check_status(response.status_code(), "upload file", key)?;

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete file '{}': {}", key, e)))?;
        check_status(response.status_code(), "delete file", key)?;

        debug!("Deleted file '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    fn url_base(&self) -> &str {
        &self.url_base
    }
}
