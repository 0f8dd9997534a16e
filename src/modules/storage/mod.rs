//! Storage module for uploaded file bytes
//!
//! `ObjectStorage` is the seam the file service talks to; `S3Client` is the
//! production implementation backed by an S3 (or S3-compatible) bucket.

mod s3_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use s3_client::S3Client;

/// Bucket-addressed blob storage
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key`
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Remove the object stored under `key`
    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// URL prefix every object URL starts with, without a trailing slash
    fn url_base(&self) -> &str;

    /// Fully-qualified URL of the object stored under `key`
    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_base(), encode_key(key))
    }

    /// Recover the object key from a URL produced by [`ObjectStorage::object_url`]
    fn key_from_url(&self, url: &str) -> Option<String> {
        let encoded = url
            .strip_prefix(self.url_base())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())?;

        urlencoding::decode(encoded).ok().map(|key| key.into_owned())
    }
}

/// Percent-encode each path segment of a key, keeping the `/` separators
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
