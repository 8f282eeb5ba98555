//! Data models for the attachment subsystem

mod media;

pub use media::{FileData, ItemId, MediaKind, SourceFile};
