//! Vitrine Core Library
//!
//! This crate provides the domain models, error types, configuration, notices and
//! validation policy shared by every part of the media attachment subsystem.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod notice;
pub mod validation;

// Re-export commonly used types
pub use config::{AttachmentConfig, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileData, ItemId, MediaKind, SourceFile};
pub use notice::{Notice, NoticeKind, NotificationSink, RecordingNotifier, TracingNotifier};
