//! In-memory upload backend
//!
//! Keeps every upload and its progress callback so the host (or a test) decides when
//! and how progress arrives. Callbacks are kept after completion, which makes it
//! possible to replay late progress for items that have since been removed.
//! In auto-complete mode the bytes of an upload are dropped once it completes, so
//! only the callback and metadata are retained.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::traits::{
    BlobUploader, ProgressCallback, StorageError, StorageResult, UploadHandle, UploadRequest,
};

struct MemoryUpload {
    handle: UploadHandle,
    request: UploadRequest,
    on_progress: ProgressCallback,
    last_reported: Option<u8>,
}

#[derive(Default)]
pub struct MemoryBlobUploader {
    uploads: Mutex<Vec<MemoryUpload>>,
    auto_complete: bool,
    fail_next: AtomicBool,
}

impl MemoryBlobUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report 100% synchronously as soon as an upload begins, then drop the bytes
    pub fn with_auto_complete() -> Self {
        Self {
            auto_complete: true,
            ..Self::default()
        }
    }

    /// Make the next `begin_upload` call fail
    pub fn fail_next_upload(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MemoryUpload>> {
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deliver a progress value for `handle`. Returns false for unknown handles.
    ///
    /// The callback runs outside the internal lock.
    pub fn report(&self, handle: &UploadHandle, pct: u8) -> bool {
        let pct = pct.min(100);
        let callback = {
            let mut uploads = self.lock();
            match uploads.iter_mut().find(|u| &u.handle == handle) {
                Some(upload) => {
                    upload.last_reported = Some(pct);
                    if self.auto_complete && pct == 100 {
                        upload.request.data = Bytes::new();
                    }
                    upload.on_progress.clone()
                }
                None => return false,
            }
        };
        callback(pct);
        true
    }

    pub fn complete(&self, handle: &UploadHandle) -> bool {
        self.report(handle, 100)
    }

    /// Handles in the order uploads began
    pub fn handles(&self) -> Vec<UploadHandle> {
        self.lock().iter().map(|u| u.handle.clone()).collect()
    }

    pub fn upload_count(&self) -> usize {
        self.lock().len()
    }

    pub fn data(&self, handle: &UploadHandle) -> Option<Bytes> {
        self.lock()
            .iter()
            .find(|u| &u.handle == handle)
            .map(|u| u.request.data.clone())
    }

    pub fn file_name(&self, handle: &UploadHandle) -> Option<String> {
        self.lock()
            .iter()
            .find(|u| &u.handle == handle)
            .map(|u| u.request.file_name.clone())
    }

    pub fn last_reported(&self, handle: &UploadHandle) -> Option<u8> {
        self.lock()
            .iter()
            .find(|u| &u.handle == handle)
            .and_then(|u| u.last_reported)
    }
}

#[async_trait]
impl BlobUploader for MemoryBlobUploader {
    fn begin_upload(
        &self,
        request: UploadRequest,
        on_progress: ProgressCallback,
    ) -> StorageResult<UploadHandle> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(format!(
                "Simulated failure for {}",
                request.file_name
            )));
        }

        let handle = UploadHandle::new(format!("memory/{}", Uuid::new_v4()));

        tracing::debug!(
            upload_handle = %handle,
            file_name = %request.file_name,
            size_bytes = request.data.len(),
            "Starting in-memory attachment upload"
        );

        self.lock().push(MemoryUpload {
            handle: handle.clone(),
            request,
            on_progress,
            last_reported: None,
        });

        if self.auto_complete {
            self.report(&handle, 100);
        }

        Ok(handle)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn request(name: &str) -> UploadRequest {
        UploadRequest {
            file_name: name.to_string(),
            content_type: "video/mp4".to_string(),
            data: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn test_report_invokes_callback() {
        let uploader = MemoryBlobUploader::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let handle = uploader
            .begin_upload(request("a.mp4"), Arc::new(move |pct| sink.lock().unwrap().push(pct)))
            .unwrap();

        assert!(uploader.report(&handle, 30));
        assert!(uploader.report(&handle, 250));
        assert_eq!(*seen.lock().unwrap(), vec![30, 100]);
        assert_eq!(uploader.last_reported(&handle), Some(100));
        assert_eq!(uploader.data(&handle), Some(Bytes::from_static(b"data")));
        assert_eq!(uploader.file_name(&handle).as_deref(), Some("a.mp4"));
    }

    #[test]
    fn test_report_unknown_handle() {
        let uploader = MemoryBlobUploader::new();
        assert!(!uploader.report(&UploadHandle::new("memory/missing"), 10));
    }

    #[test]
    fn test_auto_complete() {
        let uploader = MemoryBlobUploader::with_auto_complete();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        uploader
            .begin_upload(request("a.mp4"), Arc::new(move |pct| sink.lock().unwrap().push(pct)))
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }

    #[test]
    fn test_auto_complete_releases_bytes() {
        let uploader = MemoryBlobUploader::with_auto_complete();
        let handle = uploader
            .begin_upload(request("a.mp4"), Arc::new(|_| {}))
            .unwrap();

        assert_eq!(uploader.data(&handle), Some(Bytes::new()));
        assert_eq!(uploader.file_name(&handle).as_deref(), Some("a.mp4"));
        assert_eq!(uploader.last_reported(&handle), Some(100));
    }

    #[test]
    fn test_fail_next_upload_only_once() {
        let uploader = MemoryBlobUploader::new();
        uploader.fail_next_upload();
        assert!(uploader.begin_upload(request("a.mp4"), Arc::new(|_| {})).is_err());
        assert!(uploader.begin_upload(request("b.mp4"), Arc::new(|_| {})).is_ok());
        assert_eq!(uploader.upload_count(), 1);
    }
}
