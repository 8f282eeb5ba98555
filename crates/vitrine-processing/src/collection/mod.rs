//! Media collections
//!
//! A [`MediaCollection`] is one list of attached items plus the add pipeline that
//! feeds it. The request and testimony controllers compose collections; list state
//! only ever changes through the [`MediaList`] reducer.

mod list;
mod reducer;
mod request;
mod store;
mod testimony;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrine_core::{AttachmentConfig, ItemId, MediaKind, NotificationSink, SourceFile};
use vitrine_storage::{BlobUploader, PreviewFacility, UploadHandle};

use crate::metadata::MediaProbe;
use crate::preview::OwnedPreview;
use crate::upload::UploadTracker;
use crate::validator::AttachmentPolicy;

pub use list::MediaCollection;
pub use reducer::{ListAction, MediaList, Transition};
pub use request::{RequestAttachments, RequestMediaController};
pub use testimony::{TestimonyAttachments, TestimonyMediaController, TestimonySlot};

/// One attached file: its source, upload, preview and progress.
#[derive(Debug)]
pub struct MediaItem {
    id: ItemId,
    source: SourceFile,
    upload: UploadHandle,
    preview: OwnedPreview,
    kind: MediaKind,
    progress: u8,
    description: Option<String>,
    attached_at: DateTime<Utc>,
}

impl MediaItem {
    pub(crate) fn new(
        id: ItemId,
        source: SourceFile,
        upload: UploadHandle,
        preview: OwnedPreview,
        kind: MediaKind,
        describable: bool,
    ) -> Self {
        Self {
            id,
            source,
            upload,
            preview,
            kind,
            progress: 0,
            description: describable.then(String::new),
            attached_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn file_name(&self) -> &str {
        self.source.name()
    }

    pub fn upload(&self) -> &UploadHandle {
        &self.upload
    }

    pub fn preview(&self) -> &OwnedPreview {
        &self.preview
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.progress == 100
    }

    /// When the item passed validation and was built
    pub fn attached_at(&self) -> DateTime<Utc> {
        self.attached_at
    }

    pub(crate) fn set_progress(&mut self, pct: u8) -> bool {
        let pct = pct.min(100);
        let changed = self.progress != pct;
        self.progress = pct;
        changed
    }

    /// Replace the description. Items without one (request items) are left alone.
    pub(crate) fn set_description(&mut self, text: String) -> bool {
        match self.description.as_mut() {
            Some(description) => {
                *description = text;
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> MediaItemView {
        MediaItemView {
            id: self.id,
            file_name: self.source.name().to_string(),
            size_bytes: self.source.size_bytes(),
            content_type: self.source.content_type().to_string(),
            kind: self.kind,
            progress: self.progress,
            preview_url: self.preview.reference().as_str().to_string(),
            upload_handle: self.upload.clone(),
            description: self.description.clone(),
            attached_at: self.attached_at,
        }
    }
}

/// Read-only snapshot of a [`MediaItem`] for the surrounding form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItemView {
    pub id: ItemId,
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub kind: MediaKind,
    pub progress: u8,
    pub preview_url: String,
    pub upload_handle: UploadHandle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attached_at: DateTime<Utc>,
}

impl MediaItemView {
    pub fn is_complete(&self) -> bool {
        self.progress == 100
    }
}

/// Summary of one `add` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    /// Items committed to the list, in selection order
    pub accepted: Vec<ItemId>,
    /// Files rejected by validation or processing
    pub rejected: Vec<String>,
    /// Files not considered because the list was full
    pub skipped: Vec<String>,
}

impl AddOutcome {
    pub fn merge(mut self, other: AddOutcome) -> Self {
        self.accepted.extend(other.accepted);
        self.rejected.extend(other.rejected);
        self.skipped.extend(other.skipped);
        self
    }
}

/// Collaborators and limits shared by every list of a form.
pub struct AttachmentContext {
    policy: AttachmentPolicy,
    tracker: UploadTracker,
    previews: Arc<dyn PreviewFacility>,
    notifier: Arc<dyn NotificationSink>,
    max_testimony_photos: usize,
    max_testimony_videos: usize,
}

impl AttachmentContext {
    pub fn new(
        config: &AttachmentConfig,
        uploader: Arc<dyn BlobUploader>,
        previews: Arc<dyn PreviewFacility>,
        probe: Arc<dyn MediaProbe>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            policy: AttachmentPolicy::new(config, probe),
            tracker: UploadTracker::new(uploader),
            previews,
            notifier,
            max_testimony_photos: config.max_testimony_photos,
            max_testimony_videos: config.max_testimony_videos,
        }
    }

    pub fn policy(&self) -> &AttachmentPolicy {
        &self.policy
    }

    pub fn tracker(&self) -> &UploadTracker {
        &self.tracker
    }

    pub fn previews(&self) -> &Arc<dyn PreviewFacility> {
        &self.previews
    }

    pub fn notifier(&self) -> &Arc<dyn NotificationSink> {
        &self.notifier
    }

    pub fn uploader(&self) -> &Arc<dyn BlobUploader> {
        self.tracker.uploader()
    }
}
