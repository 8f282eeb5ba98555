use std::sync::{Arc, Weak};

use bytes::Bytes;
use vitrine_core::{ItemId, SourceFile};
use vitrine_storage::{BlobUploader, ProgressCallback, StorageResult, UploadHandle, UploadRequest};

/// State that upload progress folds into.
pub trait ProgressTarget: Send + Sync {
    /// Record `pct` for `id`. Returns false when `id` is not known to the target.
    fn apply_progress(&self, id: ItemId, pct: u8) -> bool;
}

/// Starts uploads whose progress callbacks are bound to an item id.
///
/// The callback only holds a weak reference to its target, so an upload never keeps
/// a list alive and progress for a dropped list is ignored.
pub struct UploadTracker {
    uploader: Arc<dyn BlobUploader>,
}

impl UploadTracker {
    pub fn new(uploader: Arc<dyn BlobUploader>) -> Self {
        Self { uploader }
    }

    pub fn uploader(&self) -> &Arc<dyn BlobUploader> {
        &self.uploader
    }

    /// Hand `data` to the uploader with a callback keyed by `id`.
    pub fn begin<T>(
        &self,
        id: ItemId,
        file: &SourceFile,
        data: Bytes,
        target: &Arc<T>,
    ) -> StorageResult<UploadHandle>
    where
        T: ProgressTarget + 'static,
    {
        let on_progress = progress_callback(id, Arc::downgrade(target));
        let size_bytes = data.len();

        let handle = self.uploader.begin_upload(
            UploadRequest {
                file_name: file.name().to_string(),
                content_type: file.content_type().to_string(),
                data,
            },
            on_progress,
        )?;

        tracing::debug!(
            item_id = %id,
            file_name = %file.name(),
            upload_handle = %handle,
            size_bytes = size_bytes,
            backend = self.uploader.backend_name(),
            "Upload started"
        );

        Ok(handle)
    }
}

fn progress_callback<T>(id: ItemId, target: Weak<T>) -> ProgressCallback
where
    T: ProgressTarget + 'static,
{
    Arc::new(move |pct: u8| {
        let pct = pct.min(100);
        match target.upgrade() {
            Some(target) => {
                if !target.apply_progress(id, pct) {
                    tracing::debug!(item_id = %id, progress = pct, "Ignoring progress for removed item");
                }
            }
            None => {
                tracing::debug!(item_id = %id, progress = pct, "Ignoring progress for dropped collection");
            }
        }
    })
}
