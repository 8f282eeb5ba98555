use std::sync::Arc;

use vitrine_core::{AppError, ItemId, MediaKind, SourceFile};

use super::reducer::{ListAction, MediaList};
use super::store::{BatchGuard, ListStore};
use super::{AddOutcome, AttachmentContext, MediaItem, MediaItemView};
use crate::preview::OwnedPreview;

/// One list of attached media and the pipeline that feeds it.
///
/// Dropping the collection drops every item still in it, which releases their
/// previews and turns outstanding progress callbacks into no-ops.
pub struct MediaCollection {
    ctx: Arc<AttachmentContext>,
    store: Arc<ListStore>,
    kind: Option<MediaKind>,
    capacity: Option<usize>,
    describable: bool,
}

impl MediaCollection {
    pub fn new(
        ctx: Arc<AttachmentContext>,
        kind: Option<MediaKind>,
        capacity: Option<usize>,
        describable: bool,
    ) -> Self {
        Self {
            ctx,
            store: Arc::new(ListStore::new(MediaList::new(kind, capacity, describable))),
            kind,
            capacity,
            describable,
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        self.kind
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn label(&self) -> &'static str {
        self.kind.map(|k| k.plural_label()).unwrap_or("files")
    }

    /// Validate, upload and attach `files`, in selection order.
    ///
    /// Every rejected file produces exactly one notice; accepted files are silent.
    /// Accepted items are committed together once the whole batch has been processed.
    #[tracing::instrument(skip(self, files), fields(list = self.label(), requested = files.len()))]
    pub async fn add(&self, files: Vec<SourceFile>) -> AddOutcome {
        let mut outcome = AddOutcome::default();
        if files.is_empty() {
            return outcome;
        }

        let requested = files.len();
        let mut slots = self.store.remaining();

        if slots == Some(0) {
            outcome.skipped = files.iter().map(|f| f.name().to_string()).collect();
            self.ctx.notifier().report(&AppError::CapacityExceeded {
                label: self.label().to_string(),
                limit: self.capacity.unwrap_or_default(),
                skipped: outcome.skipped.join(", "),
            });
            return outcome;
        }

        let mut guard = BatchGuard::new(self.store.clone());
        let mut built: Vec<MediaItem> = Vec::new();
        let mut no_room: Vec<String> = Vec::new();

        for file in files {
            if slots == Some(0) {
                no_room.push(file.name().to_string());
                continue;
            }

            let file_name = file.name().to_string();
            match self.prepare(file, &mut guard).await {
                Ok(item) => {
                    built.push(item);
                    if let Some(remaining) = slots.as_mut() {
                        *remaining -= 1;
                    }
                }
                Err(err) => {
                    self.ctx.notifier().report(&err);
                    outcome.rejected.push(file_name);
                }
            }
        }

        if !built.is_empty() {
            outcome.accepted = built.iter().map(|item| item.id()).collect();
            let transition = self.store.commit(built);
            drop(guard);

            if !transition.overflow.is_empty() {
                let trimmed: Vec<String> = transition
                    .overflow
                    .iter()
                    .map(|item| item.file_name().to_string())
                    .collect();
                outcome
                    .accepted
                    .retain(|id| !transition.overflow.iter().any(|item| item.id() == *id));

                tracing::warn!(
                    trimmed = trimmed.len(),
                    "Concurrent batch filled the list; trimming overflow"
                );
                self.ctx.notifier().report(&AppError::CapacityExceeded {
                    label: self.label().to_string(),
                    limit: self.capacity.unwrap_or_default(),
                    skipped: trimmed.join(", "),
                });
                outcome.skipped.extend(trimmed);
            }
        }

        if !no_room.is_empty() {
            self.ctx.notifier().report(&AppError::PartialBatch {
                label: self.label().to_string(),
                accepted: outcome.accepted.len(),
                requested,
                limit: self.capacity.unwrap_or_default(),
                skipped: no_room.join(", "),
            });
            outcome.skipped.extend(no_room);
        }

        tracing::debug!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            skipped = outcome.skipped.len(),
            "Batch processed"
        );

        outcome
    }

    async fn prepare(
        &self,
        file: SourceFile,
        guard: &mut BatchGuard,
    ) -> Result<MediaItem, AppError> {
        let kind = self.ctx.policy().validate(&file, self.kind).await?;

        let data = file
            .read_bytes()
            .await
            .map_err(|e| AppError::ReadFailed {
                file_name: file.name().to_string(),
                reason: e.to_string(),
            })?;

        let id = ItemId::new();
        guard.register(id);

        let upload = self
            .ctx
            .tracker()
            .begin(id, &file, data, &self.store)
            .map_err(|e| AppError::ReadFailed {
                file_name: file.name().to_string(),
                reason: e.to_string(),
            })?;

        let preview = OwnedPreview::acquire(self.ctx.previews().clone(), &file);

        tracing::info!(
            item_id = %id,
            file_name = %file.name(),
            kind = %kind,
            upload_handle = %upload,
            "Media accepted"
        );

        Ok(MediaItem::new(id, file, upload, preview, kind, self.describable))
    }

    /// Remove the item at `index`, releasing its preview.
    ///
    /// Returns the removed item's last view, or `None` for an out-of-range index.
    pub fn remove(&self, index: usize) -> Option<MediaItemView> {
        let transition = self.store.dispatch(ListAction::Removed(index));
        match transition.removed {
            Some(item) => {
                let view = item.view();
                tracing::info!(item_id = %item.id(), file_name = %item.file_name(), "Media removed");
                drop(item);
                Some(view)
            }
            None => {
                tracing::warn!(index, len = self.store.len(), "Remove ignored: index out of range");
                None
            }
        }
    }

    /// Replace the description of the item at `index`.
    ///
    /// Text over the length limit leaves the description unchanged and emits one
    /// notice. Returns whether the description was replaced.
    pub fn update_description(&self, index: usize, text: impl Into<String>) -> bool {
        let text = text.into();

        if !self.describable {
            tracing::warn!(index, "Descriptions are not supported on this list");
            return false;
        }

        if let Err(err) = self.ctx.policy().check_description_length(&text) {
            self.ctx.notifier().report(&err);
            return false;
        }

        let changed = self
            .store
            .dispatch(ListAction::DescriptionUpdated { index, text })
            .changed;
        if !changed {
            tracing::warn!(index, len = self.store.len(), "Description update ignored: index out of range");
        }
        changed
    }

    pub fn snapshot(&self) -> Vec<MediaItemView> {
        self.store
            .read(|list| list.items().iter().map(MediaItem::view).collect())
    }

    pub fn get(&self, index: usize) -> Option<MediaItemView> {
        self.store.read(|list| list.get(index).map(MediaItem::view))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every attached item has finished uploading
    pub fn is_uploaded(&self) -> bool {
        self.store
            .read(|list| list.items().iter().all(MediaItem::is_complete))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::test_support::{fixture, photo, video};
    use crate::metadata::FixedDurationProbe;
    use bytes::Bytes;
    use vitrine_core::{FileData, NoticeKind};

    #[tokio::test]
    async fn test_add_accepts_in_order_silently() {
        let fx = fixture(FixedDurationProbe::new().with_duration("b.mp4", 42.0));
        let list = MediaCollection::new(fx.ctx.clone(), None, None, false);

        let outcome = list
            .add(vec![photo("a.jpg"), video("b.mp4"), photo("c.png")])
            .await;

        assert_eq!(outcome.accepted.len(), 3);
        assert!(fx.notifier.is_empty());
        let names: Vec<String> = list.snapshot().into_iter().map(|v| v.file_name).collect();
        assert_eq!(names, vec!["a.jpg", "b.mp4", "c.png"]);
        assert!(list.snapshot().iter().all(|v| v.progress == 0 && v.description.is_none()));
        assert_eq!(fx.previews.live_count(), 3);
        assert_eq!(fx.uploader.upload_count(), 3);
    }

    #[tokio::test]
    async fn test_read_failure_does_not_stop_batch() {
        let fx = fixture(FixedDurationProbe::new());
        let list = MediaCollection::new(fx.ctx.clone(), None, None, false);
        let missing = SourceFile::new(
            "gone.jpg",
            "image/jpeg",
            10,
            FileData::Path("/nonexistent/vitrine/gone.jpg".into()),
        );

        let outcome = list.add(vec![photo("a.jpg"), missing, photo("b.jpg")]).await;

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.rejected, vec!["gone.jpg".to_string()]);
        let notices = fx.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert!(notices[0].message.contains("Failed to process \"gone.jpg\""));
        assert_eq!(fx.previews.live_count(), 2);
    }

    #[tokio::test]
    async fn test_upload_start_failure_is_reported() {
        let fx = fixture(FixedDurationProbe::new());
        let list = MediaCollection::new(fx.ctx.clone(), None, None, false);
        fx.uploader.fail_next_upload();

        let outcome = list.add(vec![photo("a.jpg"), photo("b.jpg")]).await;

        assert_eq!(outcome.rejected, vec!["a.jpg".to_string()]);
        assert_eq!(list.len(), 1);
        assert_eq!(fx.notifier.len(), 1);
        assert_eq!(fx.previews.total_allocations(), 1);
    }

    #[tokio::test]
    async fn test_partial_batch_warning() {
        let fx = fixture(FixedDurationProbe::new());
        let list = MediaCollection::new(fx.ctx.clone(), Some(MediaKind::Image), Some(5), true);
        list.add(vec![photo("1.jpg"), photo("2.jpg"), photo("3.jpg")])
            .await;

        let outcome = list
            .add(vec![photo("4.jpg"), photo("5.jpg"), photo("6.jpg"), photo("7.jpg")])
            .await;

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.skipped, vec!["6.jpg".to_string(), "7.jpg".to_string()]);
        assert_eq!(list.len(), 5);

        let notices = fx.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Warning);
        assert!(notices[0].message.contains("Only 2 of 4 photos"));
        assert!(notices[0].message.contains("6.jpg, 7.jpg"));
    }

    #[tokio::test]
    async fn test_rejected_files_consume_no_slot() {
        let fx = fixture(FixedDurationProbe::new());
        let list = MediaCollection::new(fx.ctx.clone(), Some(MediaKind::Image), Some(2), true);
        let big = SourceFile::new(
            "huge.jpg",
            "image/jpeg",
            900 * 1024 * 1024,
            FileData::Memory(Bytes::new()),
        );

        let outcome = list.add(vec![big, photo("a.jpg"), photo("b.jpg")]).await;

        assert_eq!(outcome.accepted.len(), 2);
        assert!(outcome.skipped.is_empty());
        assert_eq!(fx.notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_progress_before_commit_is_kept() {
        let fx = fixture(FixedDurationProbe::new());
        let uploader = Arc::new(vitrine_storage::MemoryBlobUploader::with_auto_complete());
        let ctx = Arc::new(AttachmentContext::new(
            &vitrine_core::AttachmentConfig::default(),
            uploader,
            fx.previews.clone(),
            Arc::new(FixedDurationProbe::new()),
            fx.notifier.clone(),
        ));
        let list = MediaCollection::new(ctx, None, None, false);

        list.add(vec![photo("a.jpg")]).await;

        assert_eq!(list.get(0).map(|v| v.progress), Some(100));
        assert!(list.is_uploaded());
    }

    #[tokio::test]
    async fn test_update_description_bounds() {
        let fx = fixture(FixedDurationProbe::new());
        let list = MediaCollection::new(fx.ctx.clone(), Some(MediaKind::Image), Some(5), true);
        list.add(vec![photo("a.jpg")]).await;

        assert!(list.update_description(0, "x".repeat(1500)));
        assert_eq!(fx.notifier.len(), 0);

        assert!(!list.update_description(0, "y".repeat(1501)));
        assert_eq!(fx.notifier.len(), 1);
        assert_eq!(
            list.get(0).and_then(|v| v.description).map(|d| d.len()),
            Some(1500)
        );

        assert!(!list.update_description(3, "short"));
        assert_eq!(fx.notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_out_of_range() {
        let fx = fixture(FixedDurationProbe::new());
        let list = MediaCollection::new(fx.ctx.clone(), None, None, false);
        list.add(vec![photo("a.jpg")]).await;

        assert!(list.remove(4).is_none());
        assert_eq!(list.len(), 1);

        let removed = list.remove(0).unwrap();
        assert_eq!(removed.file_name, "a.jpg");
        assert_eq!(fx.previews.live_count(), 0);
        assert!(fx.notifier.is_empty());
    }
}
