use std::sync::Arc;

use vitrine_core::validation::{
    check_description_length, check_duration, check_size, classify_kind,
};
use vitrine_core::{AppError, AttachmentConfig, MediaKind, SourceFile};

use crate::metadata::MediaProbe;

/// Attachment validation policy
///
/// Bundles the configured limits with the duration probe so every list of every
/// form validates files the same way.
pub struct AttachmentPolicy {
    max_file_size_bytes: u64,
    max_video_duration_secs: f64,
    max_description_length: usize,
    probe: Arc<dyn MediaProbe>,
}

impl AttachmentPolicy {
    pub fn new(config: &AttachmentConfig, probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes,
            max_video_duration_secs: config.max_video_duration_secs,
            max_description_length: config.max_description_length,
            probe,
        }
    }

    pub fn max_description_length(&self) -> usize {
        self.max_description_length
    }

    /// Classify `file` and check it against the kind a list accepts.
    ///
    /// `expected = None` accepts both images and videos.
    pub fn classify(
        &self,
        file: &SourceFile,
        expected: Option<MediaKind>,
    ) -> Result<MediaKind, AppError> {
        let mismatch = || AppError::UnsupportedMediaType {
            file_name: file.name().to_string(),
            content_type: if file.content_type().is_empty() {
                "unknown type".to_string()
            } else {
                file.content_type().to_string()
            },
            expected: match expected {
                Some(kind) => kind.label().to_string(),
                None => "photo or video".to_string(),
            },
        };

        match (classify_kind(file.content_type()), expected) {
            (None, _) => Err(mismatch()),
            (Some(kind), Some(wanted)) if kind != wanted => Err(mismatch()),
            (Some(kind), _) => Ok(kind),
        }
    }

    pub fn check_size(&self, file: &SourceFile) -> Result<(), AppError> {
        check_size(file, self.max_file_size_bytes)
    }

    /// Probe the video's duration and check it against the ceiling.
    ///
    /// A probe failure, or a duration that is not a finite non-negative number, is
    /// reported as unreadable metadata rather than as a duration violation.
    pub async fn check_video_duration(&self, file: &SourceFile) -> Result<f64, AppError> {
        let duration = match self.probe.probe_duration(file).await {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => secs,
            Ok(secs) => {
                return Err(AppError::MetadataUnreadable {
                    file_name: file.name().to_string(),
                    reason: format!("probe reported an invalid duration: {}", secs),
                })
            }
            Err(e) => {
                return Err(AppError::MetadataUnreadable {
                    file_name: file.name().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        check_duration(file, duration, self.max_video_duration_secs)?;
        Ok(duration)
    }

    pub fn check_description_length(&self, text: &str) -> Result<(), AppError> {
        check_description_length(text, self.max_description_length)
    }

    /// Run every check that applies to `file`, in pipeline order.
    pub async fn validate(
        &self,
        file: &SourceFile,
        expected: Option<MediaKind>,
    ) -> Result<MediaKind, AppError> {
        let kind = self.classify(file, expected)?;
        self.check_size(file)?;
        if kind == MediaKind::Video {
            self.check_video_duration(file).await?;
        }
        Ok(kind)
    }
}
