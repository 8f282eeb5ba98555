#[cfg(feature = "storage-local")]
use crate::LocalBlobUploader;
#[cfg(feature = "storage-memory")]
use crate::MemoryBlobUploader;
#[cfg(any(not(feature = "storage-local"), not(feature = "storage-memory")))]
use crate::StorageError;
use crate::{BlobUploader, StorageResult};
use std::sync::Arc;
use vitrine_core::AttachmentConfig;

/// Create an upload backend based on configuration
///
/// A configured `upload_dir` selects the local backend; otherwise uploads stay in
/// memory and complete immediately.
pub async fn create_uploader(config: &AttachmentConfig) -> StorageResult<Arc<dyn BlobUploader>> {
    match config.upload_dir.as_deref() {
        #[cfg(feature = "storage-local")]
        Some(dir) => {
            let uploader = LocalBlobUploader::new(dir, config.upload_chunk_bytes).await?;
            tracing::info!(upload_dir = %dir, "Using local attachment uploads");
            Ok(Arc::new(uploader))
        }

        #[cfg(not(feature = "storage-local"))]
        Some(_) => Err(StorageError::ConfigError(
            "Local upload backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        None => {
            tracing::info!("VITRINE_UPLOAD_DIR not set, keeping attachment uploads in memory");
            Ok(Arc::new(MemoryBlobUploader::with_auto_complete()))
        }

        #[cfg(not(feature = "storage-memory"))]
        None => Err(StorageError::ConfigError(
            "VITRINE_UPLOAD_DIR not configured".to_string(),
        )),
    }
}
