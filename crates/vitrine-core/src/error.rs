//! Error types module
//!
//! This module provides the core error type used throughout the attachment subsystem.
//! Every rejection the add pipeline can produce is a variant of [`AppError`], and its
//! display text is the message shown to the customer. [`ErrorMetadata`] lets each
//! variant self-describe how it is surfaced (notice kind, log level, retry hint).

use std::io;

use crate::notice::NoticeKind;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like unreadable media
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for user-facing reporting - defines how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether the customer can fix this by picking another file
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the customer
    fn suggested_action(&self) -> Option<&'static str>;

    /// Customer-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Toast kind used when this error is surfaced as a notice
    fn notice_kind(&self) -> NoticeKind;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("\"{file_name}\" is not a supported {expected} ({content_type})")]
    UnsupportedMediaType {
        file_name: String,
        content_type: String,
        expected: String,
    },

    #[error("\"{file_name}\" is too large ({size}). The maximum file size is {max}")]
    FileTooLarge {
        file_name: String,
        size: String,
        max: String,
    },

    #[error("\"{file_name}\" is too long ({duration}). The maximum video length is {max}")]
    DurationTooLong {
        file_name: String,
        duration: String,
        max: String,
    },

    #[error("Could not read the video metadata of \"{file_name}\"; the file may be corrupt or in an unsupported format")]
    MetadataUnreadable { file_name: String, reason: String },

    #[error("You can attach at most {limit} {label}. Not added: {skipped}")]
    CapacityExceeded {
        label: String,
        limit: usize,
        skipped: String,
    },

    #[error("Only {accepted} of {requested} {label} were added (limit {limit}). Not added: {skipped}")]
    PartialBatch {
        label: String,
        accepted: usize,
        requested: usize,
        limit: usize,
        skipped: String,
    },

    #[error("Description is too long ({length} characters). The maximum is {max} characters")]
    DescriptionTooLong { length: usize, max: usize },

    #[error("Failed to process \"{file_name}\"")]
    ReadFailed { file_name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, notice_kind, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (&'static str, bool, Option<&'static str>, NoticeKind, LogLevel) {
    match err {
        AppError::UnsupportedMediaType { .. } => (
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Choose a photo or video file"),
            NoticeKind::Error,
            LogLevel::Debug,
        ),
        AppError::FileTooLarge { .. } => (
            "FILE_TOO_LARGE",
            true,
            Some("Choose a smaller file"),
            NoticeKind::Error,
            LogLevel::Debug,
        ),
        AppError::DurationTooLong { .. } => (
            "DURATION_TOO_LONG",
            true,
            Some("Trim the video or choose a shorter one"),
            NoticeKind::Error,
            LogLevel::Debug,
        ),
        AppError::MetadataUnreadable { .. } => (
            "METADATA_UNREADABLE",
            false,
            Some("Re-export the video or choose another file"),
            NoticeKind::Error,
            LogLevel::Warn,
        ),
        AppError::CapacityExceeded { .. } => (
            "CAPACITY_EXCEEDED",
            true,
            Some("Remove an attachment before adding another"),
            NoticeKind::Error,
            LogLevel::Debug,
        ),
        AppError::PartialBatch { .. } => (
            "PARTIAL_BATCH",
            true,
            Some("Remove an attachment before adding another"),
            NoticeKind::Warning,
            LogLevel::Debug,
        ),
        AppError::DescriptionTooLong { .. } => (
            "DESCRIPTION_TOO_LONG",
            true,
            Some("Shorten the description"),
            NoticeKind::Error,
            LogLevel::Debug,
        ),
        AppError::ReadFailed { .. } => (
            "READ_FAILED",
            true,
            Some("Try selecting the file again"),
            NoticeKind::Error,
            LogLevel::Error,
        ),
        AppError::InvalidConfig(_) => (
            "INVALID_CONFIG",
            false,
            None,
            NoticeKind::Error,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            NoticeKind::Error,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for diagnostics
    pub fn error_type(&self) -> &str {
        match self {
            AppError::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::DurationTooLong { .. } => "DurationTooLong",
            AppError::MetadataUnreadable { .. } => "MetadataUnreadable",
            AppError::CapacityExceeded { .. } => "CapacityExceeded",
            AppError::PartialBatch { .. } => "PartialBatch",
            AppError::DescriptionTooLong { .. } => "DescriptionTooLong",
            AppError::ReadFailed { .. } => "ReadFailed",
            AppError::InvalidConfig(_) => "InvalidConfig",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain and hidden reasons
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        match self {
            AppError::MetadataUnreadable { reason, .. } | AppError::ReadFailed { reason, .. } => {
                details.push_str(&format!("\n  Reason: {}", reason));
            }
            _ => {}
        }

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn notice_kind(&self) -> NoticeKind {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidConfig(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}
