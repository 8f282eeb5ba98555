//! Media metadata probing
//!
//! The only metadata the attachment pipeline needs is a video's duration. Probing is
//! asynchronous and can fail for corrupt or unsupported files; that failure is kept
//! distinct from "too long" all the way to the customer notice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use vitrine_core::SourceFile;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to execute ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffprobe failed: {0}")]
    ProbeFailed(String),

    #[error("Could not parse probe output: {0}")]
    InvalidOutput(String),

    #[error("No duration in media metadata")]
    MissingDuration,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of video durations
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Duration of `file` in seconds
    async fn probe_duration(&self, file: &SourceFile) -> Result<f64, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Read `format.duration` from `ffprobe -print_format json -show_format` output.
pub fn parse_ffprobe_duration(stdout: &[u8]) -> Result<f64, ProbeError> {
    let output: FfprobeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::InvalidOutput(e.to_string()))?;

    let raw = output
        .format
        .and_then(|f| f.duration)
        .ok_or(ProbeError::MissingDuration)?;

    raw.trim()
        .parse::<f64>()
        .map_err(|_| ProbeError::InvalidOutput(format!("duration '{}' is not a number", raw)))
}

#[cfg(feature = "ffprobe")]
mod ffprobe {
    use std::path::Path;

    use anyhow::anyhow;
    use tokio::process::Command;
    use vitrine_core::{FileData, SourceFile};

    use super::{parse_ffprobe_duration, MediaProbe, ProbeError};

    /// Probe backed by the `ffprobe` binary
    pub struct FfprobeProbe {
        ffprobe_path: String,
    }

    impl FfprobeProbe {
        pub fn new(ffprobe_path: impl Into<String>) -> anyhow::Result<Self> {
            let ffprobe_path = ffprobe_path.into();

            if ffprobe_path.trim().is_empty() {
                return Err(anyhow!("Invalid ffprobe_path: empty"));
            }

            if !ffprobe_path.chars().all(|c| {
                c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
            }) {
                return Err(anyhow!("Invalid ffprobe_path: contains unsafe characters"));
            }

            Ok(Self { ffprobe_path })
        }

        #[tracing::instrument(skip(self), fields(
            process.executable.name = "ffprobe",
            process.executable.path = %self.ffprobe_path,
        ))]
        async fn probe_path(&self, path: &Path) -> Result<f64, ProbeError> {
            let start = std::time::Instant::now();

            let output = Command::new(&self.ffprobe_path)
                .args(["-v", "error", "-print_format", "json", "-show_format"])
                .arg(path)
                .output()
                .await
                .map_err(ProbeError::Spawn)?;

            if !output.status.success() {
                return Err(ProbeError::ProbeFailed(
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                ));
            }

            let duration = parse_ffprobe_duration(&output.stdout)?;

            tracing::debug!(
                duration_secs = duration,
                probe_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Probed media duration"
            );

            Ok(duration)
        }
    }

    #[async_trait::async_trait]
    impl MediaProbe for FfprobeProbe {
        async fn probe_duration(&self, file: &SourceFile) -> Result<f64, ProbeError> {
            match file.data() {
                FileData::Path(path) => self.probe_path(path).await,
                FileData::Memory(bytes) => {
                    // ffprobe needs a seekable file
                    let temp_file = tempfile::NamedTempFile::new()?;
                    tokio::fs::write(temp_file.path(), bytes).await?;
                    self.probe_path(temp_file.path()).await
                }
            }
        }
    }
}

#[cfg(feature = "ffprobe")]
pub use ffprobe::FfprobeProbe;

/// Probe answering from a table keyed by file name.
///
/// For hosts that already know durations (e.g. reported by the player that decoded
/// the preview) and for tests. Unknown names probe as [`ProbeError::MissingDuration`].
#[derive(Debug, Default)]
pub struct FixedDurationProbe {
    durations: HashMap<String, Result<f64, String>>,
    calls: AtomicUsize,
}

impl FixedDurationProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, file_name: impl Into<String>, secs: f64) -> Self {
        self.durations.insert(file_name.into(), Ok(secs));
        self
    }

    pub fn with_failure(mut self, file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.durations.insert(file_name.into(), Err(reason.into()));
        self
    }

    /// Number of probes performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProbe for FixedDurationProbe {
    async fn probe_duration(&self, file: &SourceFile) -> Result<f64, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.durations.get(file.name()) {
            Some(Ok(secs)) => Ok(*secs),
            Some(Err(reason)) => Err(ProbeError::ProbeFailed(reason.clone())),
            None => Err(ProbeError::MissingDuration),
        }
    }
}
