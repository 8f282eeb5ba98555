//! User-facing notices
//!
//! The storefront shows validation outcomes as toasts. The attachment subsystem only
//! sees the [`NotificationSink`] trait: fire-and-forget, called synchronously at the
//! point a failure is detected.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorMetadata, LogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Sink for toast-style notices
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);

    /// Log an error at its own level and surface it as exactly one notice.
    fn report(&self, err: &AppError) {
        let details = err.detailed_message();
        match err.log_level() {
            LogLevel::Debug => {
                tracing::debug!(error_code = err.error_code(), details = %details, "Attachment rejected")
            }
            LogLevel::Warn => {
                tracing::warn!(error_code = err.error_code(), details = %details, "Attachment rejected")
            }
            LogLevel::Error => {
                tracing::error!(error_code = err.error_code(), details = %details, "Attachment failed")
            }
        }
        self.notify(err.notice_kind(), &err.client_message());
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, kind: NoticeKind, message: &str) {
        (**self).notify(kind, message)
    }
}

/// Notifier that only writes notices to the log (headless use)
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(notice = %message, "Notice"),
            NoticeKind::Warning => tracing::warn!(notice = %message, "Notice"),
            NoticeKind::Error => tracing::warn!(notice = %message, kind = "error", "Notice"),
        }
    }
}

/// Notifier that keeps every notice in order, for forms that render them later
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return all recorded notices
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(
            &mut *self
                .notices
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        TracingNotifier.notify(kind, message);
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notice {
                kind,
                message: message.to_string(),
            });
    }
}
