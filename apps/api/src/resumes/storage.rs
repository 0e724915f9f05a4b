//! Raw resume file storage: S3/MinIO when configured, a local directory otherwise.

use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resumes::extract::DocumentKind;

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// `s3://bucket/key` or a filesystem path.
    pub location: String,
    pub size: i64,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(
        &self,
        owner_id: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, AppError>;

    fn name(&self) -> &'static str;
}

/// `resumes/<owner>/<uuid><ext>`, keeping the original extension lower-cased.
pub fn object_key(owner_id: &str, file_name: &str) -> String {
    let ext = DocumentKind::from_file_name(file_name)
        .map(|kind| format!(".{}", kind.extension()))
        .unwrap_or_default();
    format!("resumes/{owner_id}/{}{ext}", Uuid::new_v4())
}

// ────────────────────────────────────────────────────────────────
// S3 / MinIO
// ────────────────────────────────────────────────────────────────

pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(
        &self,
        owner_id: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, AppError> {
        let key = object_key(owner_id, file_name);
        let size = bytes.len() as i64;
        let content_type = DocumentKind::from_file_name(file_name)
            .map(DocumentKind::content_type)
            .unwrap_or("application/octet-stream");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(StoredFile {
            location: format!("s3://{}/{}", self.bucket, key),
            size,
        })
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

// ────────────────────────────────────────────────────────────────
// Local directory
// ────────────────────────────────────────────────────────────────

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(
        &self,
        owner_id: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, AppError> {
        let path = self.root.join(object_key(owner_id, file_name));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {e}", path.display())))?;

        info!("Saved resume to {}", path.display());
        Ok(StoredFile {
            location: path.to_string_lossy().into_owned(),
            size: bytes.len() as i64,
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
