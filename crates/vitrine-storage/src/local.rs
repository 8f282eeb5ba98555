use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

use crate::keys::generate_storage_key;
use crate::traits::{
    BlobUploader, ProgressCallback, StorageError, StorageResult, UploadHandle, UploadRequest,
};

/// Local filesystem upload backend
///
/// Each upload is written in chunks on its own tokio task; progress is reported
/// after every chunk as the share of bytes written so far.
pub struct LocalBlobUploader {
    base_path: PathBuf,
    chunk_bytes: usize,
    in_flight: Mutex<Vec<(UploadHandle, JoinHandle<StorageResult<()>>)>>,
}

impl LocalBlobUploader {
    /// Create a new LocalBlobUploader instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for uploaded attachments
    /// * `chunk_bytes` - Size of each write; one progress report per chunk
    pub async fn new(base_path: impl Into<PathBuf>, chunk_bytes: usize) -> StorageResult<Self> {
        let base_path = base_path.into();

        if chunk_bytes == 0 {
            return Err(StorageError::ConfigError(
                "Upload chunk size must be greater than 0".to_string(),
            ));
        }

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobUploader {
            base_path,
            chunk_bytes,
            in_flight: Mutex::new(Vec::new()),
        })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Absolute path of an uploaded attachment
    pub fn path_for(&self, handle: &UploadHandle) -> StorageResult<PathBuf> {
        self.key_to_path(handle.as_str())
    }

    fn percent(written: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        ((written as u128 * 100) / total as u128).min(100) as u8
    }

    async fn write_chunked(
        path: PathBuf,
        data: Bytes,
        chunk_bytes: usize,
        on_progress: ProgressCallback,
    ) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        on_progress(0);

        let total = data.len();
        let mut written = 0;
        for chunk in data.chunks(chunk_bytes) {
            file.write_all(chunk).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            written += chunk.len();
            on_progress(Self::percent(written, total));
            tokio::task::yield_now().await;
        }

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        if total == 0 {
            on_progress(100);
        }

        tracing::info!(
            path = %path.display(),
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local attachment upload successful"
        );

        Ok(())
    }
}

#[async_trait]
impl BlobUploader for LocalBlobUploader {
    fn begin_upload(
        &self,
        request: UploadRequest,
        on_progress: ProgressCallback,
    ) -> StorageResult<UploadHandle> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            StorageError::BackendError(format!("Local uploads need a tokio runtime: {}", e))
        })?;

        let key = generate_storage_key(&request.file_name);
        let path = self.key_to_path(&key)?;
        let handle = UploadHandle::new(key);

        tracing::debug!(
            upload_handle = %handle,
            file_name = %request.file_name,
            content_type = %request.content_type,
            size_bytes = request.data.len(),
            "Starting local attachment upload"
        );

        let task = runtime.spawn(Self::write_chunked(
            path,
            request.data,
            self.chunk_bytes,
            on_progress,
        ));

        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((handle.clone(), task));

        Ok(handle)
    }

    async fn finish_pending(&self) -> StorageResult<()> {
        let pending = std::mem::take(
            &mut *self
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );

        let mut first_error = None;
        for (handle, task) in pending {
            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => Err(StorageError::UploadFailed(format!(
                    "Upload task for {} did not finish: {}",
                    handle, e
                ))),
            };
            if let Err(e) = outcome {
                tracing::error!(upload_handle = %handle, error = %e, "Local attachment upload failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
