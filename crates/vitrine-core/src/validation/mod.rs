//! Validation policy
//!
//! Pure, stateless checks applied to every selected file before it is attached, plus
//! the presentation helpers used to build their messages. Limits are passed in
//! explicitly; [`AttachmentConfig`](crate::AttachmentConfig) holds the configured values.

use crate::error::AppError;
use crate::models::{MediaKind, SourceFile};

const BYTE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Classify a declared content type as image or video.
///
/// Returns `None` for anything else; such files are always rejected upstream.
pub fn classify_kind(content_type: &str) -> Option<MediaKind> {
    let normalized = content_type.trim().to_ascii_lowercase();
    if normalized.starts_with("image/") {
        Some(MediaKind::Image)
    } else if normalized.starts_with("video/") {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Fail when the declared size exceeds `max_bytes`. Zero-byte files pass.
pub fn check_size(file: &SourceFile, max_bytes: u64) -> Result<(), AppError> {
    if file.size_bytes() > max_bytes {
        return Err(AppError::FileTooLarge {
            file_name: file.name().to_string(),
            size: format_bytes(file.size_bytes()),
            max: format_bytes(max_bytes),
        });
    }

    Ok(())
}

/// Fail when a probed duration exceeds `max_secs`.
///
/// The reported duration is rounded up so an over-limit clip never prints as the limit.
pub fn check_duration(file: &SourceFile, duration_secs: f64, max_secs: f64) -> Result<(), AppError> {
    if duration_secs > max_secs {
        return Err(AppError::DurationTooLong {
            file_name: file.name().to_string(),
            duration: format_duration(duration_secs.ceil()),
            max: format_duration(max_secs),
        });
    }

    Ok(())
}

/// Fail when `text` has more than `max_chars` characters.
pub fn check_description_length(text: &str, max_chars: usize) -> Result<(), AppError> {
    let length = text.chars().count();
    if length > max_chars {
        return Err(AppError::DescriptionTooLong {
            length,
            max: max_chars,
        });
    }

    Ok(())
}

/// Human-readable size with binary prefixes (`0 Bytes`, `1.5 KB`, `800 MB`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut number = format!("{:.2}", value);
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }

    format!("{} {}", number, BYTE_UNITS[unit])
}

/// Duration as `M:SS`, seconds floored.
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }

    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Content type for a file extension, for hosts that only know file names.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_lowercase().as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        // Common non-media files, so they get a precise rejection message
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileData;
    use bytes::Bytes;

    fn declared(name: &str, content_type: &str, size: u64) -> SourceFile {
        SourceFile::new(name, content_type, size, FileData::Memory(Bytes::new()))
    }

    #[test]
    fn test_classify_kind() {
        assert_eq!(classify_kind("image/jpeg"), Some(MediaKind::Image));
        assert_eq!(classify_kind("IMAGE/PNG"), Some(MediaKind::Image));
        assert_eq!(classify_kind("video/mp4"), Some(MediaKind::Video));
        assert_eq!(classify_kind("application/pdf"), None);
        assert_eq!(classify_kind(""), None);
        // Prefix match only
        assert_eq!(classify_kind("application/x-image/png"), None);
    }

    #[test]
    fn test_check_size_ok_at_limit() {
        let max = 800 * 1024 * 1024;
        assert!(check_size(&declared("a.mp4", "video/mp4", max), max).is_ok());
    }

    #[test]
    fn test_check_size_zero_byte_file_passes() {
        assert!(check_size(&declared("empty.jpg", "image/jpeg", 0), 1024).is_ok());
    }

    #[test]
    fn test_check_size_too_large_names_file_and_size() {
        let max = 800 * 1024 * 1024;
        let err = check_size(&declared("big.mp4", "video/mp4", 900 * 1024 * 1024), max)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("big.mp4"));
        assert!(message.contains("900 MB"));
        assert!(message.contains("800 MB"));
    }

    #[test]
    fn test_check_duration() {
        let file = declared("clip.mp4", "video/mp4", 10);
        assert!(check_duration(&file, 300.0, 300.0).is_ok());
        let err = check_duration(&file, 330.0, 300.0).unwrap_err();
        assert!(err.to_string().contains("5:30"));
        assert!(err.to_string().contains("5:00"));
    }

    #[test]
    fn test_check_duration_just_over_limit_rounds_up() {
        let file = declared("clip.mp4", "video/mp4", 10);
        let err = check_duration(&file, 300.4, 300.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"clip.mp4\" is too long (5:01). The maximum video length is 5:00"
        );
    }

    #[test]
    fn test_check_description_length_counts_chars() {
        let exact = "é".repeat(1500);
        assert!(check_description_length(&exact, 1500).is_ok());

        let over = "a".repeat(1501);
        assert!(matches!(
            check_description_length(&over, 1500),
            Err(AppError::DescriptionTooLong {
                length: 1501,
                max: 1500
            })
        ));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_bytes(900 * 1024 * 1024), "900 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
        // No TB unit; stays in GB
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(9.99), "0:09");
        assert_eq!(format_duration(61.9), "1:01");
        assert_eq!(format_duration(300.0), "5:00");
        assert_eq!(format_duration(3725.0), "62:05");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_content_type_for_extension() {
        assert_eq!(content_type_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for_extension("mov"), Some("video/quicktime"));
        assert_eq!(content_type_for_extension("exe"), None);
    }
}
