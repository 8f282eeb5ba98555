use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media kind enum
///
/// Derived once from the declared content type of a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Singular label used in customer-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "photo",
            MediaKind::Video => "video",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            MediaKind::Image => "photos",
            MediaKind::Video => "videos",
        }
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "photo" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Stable identity of an attached item, assigned when its file passes validation.
///
/// Progress callbacks are keyed by this id rather than by list position, so a
/// callback can always tell whether its item is still attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Where the bytes of a selected file live.
#[derive(Debug, Clone)]
pub enum FileData {
    /// Bytes already handed over by the file chooser
    Memory(Bytes),
    /// A file on disk, read lazily
    Path(PathBuf),
}

/// A file as presented by the file chooser.
///
/// Name, size and content type are the values the chooser declared; they are
/// captured once and never change. The bytes are only read after the file has
/// passed validation.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    size_bytes: u64,
    content_type: String,
    data: FileData,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        data: FileData,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            content_type: content_type.into(),
            data,
        }
    }

    /// In-memory file whose declared size is the length of `data`
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let size_bytes = data.len() as u64;
        Self::new(name, content_type, size_bytes, FileData::Memory(data))
    }

    /// File on disk; the size is taken from the filesystem
    pub async fn from_path(
        path: impl AsRef<Path>,
        content_type: impl Into<String>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        Ok(Self::new(
            name,
            content_type,
            metadata.len(),
            FileData::Path(path.to_path_buf()),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &FileData {
        &self.data
    }

    /// Lowercased extension of the original name, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Read the full byte content of the file.
    pub async fn read_bytes(&self) -> std::io::Result<Bytes> {
        match &self.data {
            FileData::Memory(bytes) => Ok(bytes.clone()),
            FileData::Path(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }
}
