use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vitrine_core::validation::classify_kind;
use vitrine_core::{MediaKind, SourceFile};

use super::{AddOutcome, AttachmentContext, MediaCollection, MediaItemView};

/// Which testimony list an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonySlot {
    Photos,
    Videos,
}

impl TestimonySlot {
    pub fn kind(&self) -> MediaKind {
        match self {
            TestimonySlot::Photos => MediaKind::Image,
            TestimonySlot::Videos => MediaKind::Video,
        }
    }
}

impl From<MediaKind> for TestimonySlot {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => TestimonySlot::Photos,
            MediaKind::Video => TestimonySlot::Videos,
        }
    }
}

impl Display for TestimonySlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TestimonySlot::Photos => write!(f, "photos"),
            TestimonySlot::Videos => write!(f, "videos"),
        }
    }
}

/// Attachments of a customer testimony, ready for submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonyAttachments {
    pub photos: Vec<MediaItemView>,
    pub videos: Vec<MediaItemView>,
}

impl TestimonyAttachments {
    pub fn is_uploaded(&self) -> bool {
        self.photos
            .iter()
            .chain(self.videos.iter())
            .all(MediaItemView::is_complete)
    }
}

/// Controller for the testimony form: a capped photo list and a capped video list,
/// each item carrying a description.
pub struct TestimonyMediaController {
    ctx: Arc<AttachmentContext>,
    photos: MediaCollection,
    videos: MediaCollection,
}

impl TestimonyMediaController {
    pub fn new(ctx: Arc<AttachmentContext>) -> Self {
        let photos = MediaCollection::new(
            ctx.clone(),
            Some(MediaKind::Image),
            Some(ctx.max_testimony_photos),
            true,
        );
        let videos = MediaCollection::new(
            ctx.clone(),
            Some(MediaKind::Video),
            Some(ctx.max_testimony_videos),
            true,
        );
        Self {
            ctx,
            photos,
            videos,
        }
    }

    pub fn collection(&self, slot: TestimonySlot) -> &MediaCollection {
        match slot {
            TestimonySlot::Photos => &self.photos,
            TestimonySlot::Videos => &self.videos,
        }
    }

    /// Route each file to its list by kind and run both lists' pipelines.
    ///
    /// Files that are neither photos nor videos are rejected with one notice each.
    pub async fn add(&self, files: Vec<SourceFile>) -> AddOutcome {
        let mut photos = Vec::new();
        let mut videos = Vec::new();
        let mut outcome = AddOutcome::default();

        for file in files {
            match classify_kind(file.content_type()) {
                Some(MediaKind::Image) => photos.push(file),
                Some(MediaKind::Video) => videos.push(file),
                None => {
                    if let Err(err) = self.ctx.policy().classify(&file, None) {
                        self.ctx.notifier().report(&err);
                    }
                    outcome.rejected.push(file.name().to_string());
                }
            }
        }

        let (photo_outcome, video_outcome) =
            tokio::join!(self.photos.add(photos), self.videos.add(videos));

        outcome.merge(photo_outcome).merge(video_outcome)
    }

    pub async fn add_photos(&self, files: Vec<SourceFile>) -> AddOutcome {
        self.photos.add(files).await
    }

    pub async fn add_videos(&self, files: Vec<SourceFile>) -> AddOutcome {
        self.videos.add(files).await
    }

    pub fn remove(&self, slot: TestimonySlot, index: usize) -> Option<MediaItemView> {
        self.collection(slot).remove(index)
    }

    pub fn update_description(
        &self,
        slot: TestimonySlot,
        index: usize,
        text: impl Into<String>,
    ) -> bool {
        self.collection(slot).update_description(index, text)
    }

    pub fn photos(&self) -> Vec<MediaItemView> {
        self.photos.snapshot()
    }

    pub fn videos(&self) -> Vec<MediaItemView> {
        self.videos.snapshot()
    }

    pub fn attachment_set(&self) -> TestimonyAttachments {
        TestimonyAttachments {
            photos: self.photos.snapshot(),
            videos: self.videos.snapshot(),
        }
    }
}
