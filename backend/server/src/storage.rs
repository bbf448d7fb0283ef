//! # S3
//!
//! Object storage for raw files dropped in through the upload proxy routes.
//! Handlers only see [`ObjectStore`], so tests swap in an in-memory store.
use async_trait::async_trait;
use aws_sdk_s3::{Client, primitives::ByteStream};
use axum::body::Bytes;
use tracing::info;

use crate::error::AppError;

pub const DEFAULT_FOLDER: &str = "uploads";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), AppError>;
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), AppError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!(bucket = %self.bucket, key, size, "Stored object");

        Ok(())
    }
}

/// Object key for an uploaded file: `{folder}/{file name}`.
///
/// Path separators and parent references are stripped from both parts so a
/// client cannot write outside its folder.
pub fn object_key(folder: Option<&str>, file_name: &str) -> Result<String, AppError> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .ok_or_else(|| AppError::malformed("File name is required"))?;

    let folder = folder
        .map(|f| {
            f.split('/')
                .map(str::trim)
                .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
                .collect::<Vec<_>>()
                .join("/")
        })
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_FOLDER.to_string());

    Ok(format!("{folder}/{name}"))
}
