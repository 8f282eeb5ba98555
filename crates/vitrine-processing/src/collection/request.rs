use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vitrine_core::SourceFile;

use super::{AddOutcome, AttachmentContext, MediaCollection, MediaItemView};

/// Attachments of a custom-project request, ready for submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestAttachments {
    pub items: Vec<MediaItemView>,
}

impl RequestAttachments {
    pub fn is_uploaded(&self) -> bool {
        self.items.iter().all(MediaItemView::is_complete)
    }
}

/// Controller for the custom-project request form: one uncapped list of photos
/// and videos, without descriptions.
pub struct RequestMediaController {
    list: MediaCollection,
}

impl RequestMediaController {
    pub fn new(ctx: Arc<AttachmentContext>) -> Self {
        Self {
            list: MediaCollection::new(ctx, None, None, false),
        }
    }

    pub async fn add(&self, files: Vec<SourceFile>) -> AddOutcome {
        self.list.add(files).await
    }

    pub fn remove(&self, index: usize) -> Option<MediaItemView> {
        self.list.remove(index)
    }

    pub fn snapshot(&self) -> Vec<MediaItemView> {
        self.list.snapshot()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn attachment_set(&self) -> RequestAttachments {
        RequestAttachments {
            items: self.list.snapshot(),
        }
    }
}
