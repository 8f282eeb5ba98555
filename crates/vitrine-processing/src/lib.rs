//! Vitrine Processing Library
//!
//! The attachment pipeline: validation policy, duration probing, scoped preview
//! ownership, upload progress tracking, and the media collection controllers the
//! storefront forms bind to.
//!
//! Two controller flavours exist:
//! - [`RequestMediaController`]: one uncapped list of photos and videos for a
//!   custom-project request
//! - [`TestimonyMediaController`]: independent photo (max 5) and video (max 3) lists,
//!   each item carrying a description

pub mod collection;
pub mod metadata;
pub mod preview;
pub mod upload;
pub mod validator;

pub use collection::{
    AddOutcome, AttachmentContext, ListAction, MediaCollection, MediaItem, MediaItemView,
    MediaList, RequestAttachments, RequestMediaController, TestimonyAttachments,
    TestimonyMediaController, TestimonySlot, Transition,
};
#[cfg(feature = "ffprobe")]
pub use metadata::FfprobeProbe;
pub use metadata::{FixedDurationProbe, MediaProbe, ProbeError};
pub use preview::OwnedPreview;
pub use upload::{ProgressTarget, UploadTracker};
pub use validator::AttachmentPolicy;
