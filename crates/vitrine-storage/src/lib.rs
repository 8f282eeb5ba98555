//! Vitrine Storage Library
//!
//! This crate provides the collaborators the attachment subsystem hands bytes and
//! previews to: the [`BlobUploader`] primitive (with in-memory and local-directory
//! backends) and the [`PreviewFacility`] that hands out transient preview references.
//!
//! # Upload key format
//!
//! Uploaded attachments are keyed `attachments/{uuid}.{ext}`, where `ext` comes from
//! the sanitized original file name. Keys never contain `..` or a leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod preview;
pub mod traits;

// Re-export commonly used types
pub use factory::create_uploader;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobUploader;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryBlobUploader;
pub use preview::{PreviewFacility, PreviewRef, PreviewRegistry};
pub use traits::{
    BlobUploader, ProgressCallback, StorageError, StorageResult, UploadHandle, UploadRequest,
};
