use std::path::Path;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use serde::Serialize;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Seam over the remote object store so the upload flow can be exercised
/// without network access.
#[async_trait]
pub trait ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> AppResult<()>;
}

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.into())
            .send()
            .await
            .map_err(|err| AppError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub success: bool,
    pub local_path: String,
    pub bucket: String,
    pub key: String,
    pub size_bytes: usize,
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub summary: UploadSummary,
    pub logs: Vec<String>,
}

/// Reads `local_path` and stores its bytes under `bucket/key`, replacing any
/// existing object of that name.
pub async fn upload_image<S: ObjectStore + ?Sized>(
    store: &S,
    local_path: &Path,
    bucket: &str,
    key: &str,
) -> AppResult<UploadOutcome> {
    let data = tokio::fs::read(local_path)
        .await
        .map_err(|source| AppError::ReadImage {
            path: local_path.to_path_buf(),
            source,
        })?;
    let size_bytes = data.len();
    debug!(path = %local_path.display(), size_bytes, "read local image");

    store.put_object(bucket, key, data).await?;

    let summary = UploadSummary {
        success: true,
        local_path: local_path.display().to_string(),
        bucket: bucket.to_string(),
        key: key.to_string(),
        size_bytes,
    };
    let logs = vec![format!(
        "File {} uploaded to {}/{}",
        local_path.display(),
        bucket,
        key
    )];

    Ok(UploadOutcome { summary, logs })
}
