//! Fixed limits of the attachment subsystem.
//!
//! These are the defaults of [`AttachmentConfig`](crate::AttachmentConfig) and the
//! values the storefront forms are built around.

/// 800 MiB
pub const MAX_FILE_SIZE_BYTES: u64 = 800 * 1024 * 1024;

pub const MAX_VIDEO_DURATION_SECS: f64 = 300.0;

/// Counted in characters, not bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 1500;

pub const MAX_TESTIMONY_PHOTOS: usize = 5;

pub const MAX_TESTIMONY_VIDEOS: usize = 3;

pub const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

pub const DEFAULT_UPLOAD_CHUNK_BYTES: usize = 256 * 1024;

pub const PREVIEW_URL_PREFIX: &str = "blob:vitrine/";
