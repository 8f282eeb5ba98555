//! Shared key generation for upload backends.
//!
//! Key format: `attachments/{uuid}.{ext}`, or `attachments/{uuid}` when the original
//! name has no usable extension.

use std::path::Path;

use uuid::Uuid;

const KEY_PREFIX: &str = "attachments";
const MAX_FILENAME_LEN: usize = 255;

/// Reduce a customer-supplied file name to a safe base name.
pub fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() || s.len() < 3 {
        "file".to_string()
    } else {
        s
    }
}

/// Generate a fresh storage key for an attachment with the given original name.
pub fn generate_storage_key(filename: &str) -> String {
    let safe = sanitize_filename(filename);
    let extension = Path::new(&safe)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}/{}.{}", KEY_PREFIX, Uuid::new_v4(), ext),
        None => format!("{}/{}", KEY_PREFIX, Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("holiday photo.JPG"), "holiday_photo.JPG");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a..b.png"), "invalid_filename");
        assert_eq!(sanitize_filename("x"), "file");
    }

    #[test]
    fn test_generate_storage_key() {
        let key = generate_storage_key("Clip One.MP4");
        assert!(key.starts_with("attachments/"));
        assert!(key.ends_with(".mp4"));
        assert!(!key.contains(".."));

        let no_ext = generate_storage_key("README");
        assert!(!no_ext.contains('.'));
    }
}
