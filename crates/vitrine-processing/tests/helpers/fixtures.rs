use bytes::Bytes;
use vitrine_core::{FileData, SourceFile};

/// Minimal JPEG header (SOI + APP0 marker)
pub fn jpeg(name: &str) -> SourceFile {
    SourceFile::from_bytes(
        name,
        "image/jpeg",
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'],
    )
}

/// Minimal MP4 `ftyp` box
pub fn mp4(name: &str) -> SourceFile {
    let mut data = vec![0x00, 0x00, 0x00, 0x18];
    data.extend_from_slice(b"ftypisom");
    data.extend_from_slice(&[0u8; 12]);
    SourceFile::from_bytes(name, "video/mp4", data)
}

pub fn pdf(name: &str) -> SourceFile {
    SourceFile::from_bytes(name, "application/pdf", b"%PDF-1.7".to_vec())
}

/// A file whose declared size is `size_bytes` but which carries no bytes
pub fn declared(name: &str, content_type: &str, size_bytes: u64) -> SourceFile {
    SourceFile::new(name, content_type, size_bytes, FileData::Memory(Bytes::new()))
}

/// A file whose bytes can no longer be read
pub fn vanished(name: &str, content_type: &str) -> SourceFile {
    SourceFile::new(
        name,
        content_type,
        1024,
        FileData::Path(format!("/nonexistent/vitrine-tests/{}", name).into()),
    )
}
