//! Blob upload abstraction
//!
//! This module defines the [`BlobUploader`] trait that every upload backend implements.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Sink for upload progress, called with percentages in `0..=100`.
///
/// Calls are not guaranteed to be increasing and there is no guaranteed final call
/// at 100.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Opaque handle of a started upload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadHandle(String);

impl UploadHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UploadHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Bytes handed to an uploader, with the declared file identity
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Blob upload primitive
///
/// `begin_upload` returns a handle immediately; the transfer itself proceeds
/// asynchronously and reports through `on_progress`. Implementations must not call
/// `on_progress` with values above 100.
#[async_trait]
pub trait BlobUploader: Send + Sync {
    /// Start uploading `request.data` and return its handle without waiting.
    fn begin_upload(
        &self,
        request: UploadRequest,
        on_progress: ProgressCallback,
    ) -> StorageResult<UploadHandle>;

    /// Wait for every transfer started so far. Backends without background work
    /// return immediately.
    async fn finish_pending(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
