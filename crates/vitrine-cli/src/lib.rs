//! Headless driver for the attachment pipeline.
//!
//! Runs a request or testimony controller over files on disk, the way the storefront
//! forms would, and reports the resulting attachment set with every notice raised.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use vitrine_core::validation::{content_type_for_extension, format_bytes};
use vitrine_core::{AttachmentConfig, Notice, RecordingNotifier, SourceFile};
use vitrine_processing::{
    AddOutcome, AttachmentContext, FfprobeProbe, MediaItemView, MediaProbe, RequestAttachments,
    RequestMediaController, TestimonyAttachments, TestimonyMediaController,
};
use vitrine_storage::{create_uploader, PreviewRegistry};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Which form the files are attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Custom-project request: one uncapped list
    Request,
    /// Customer testimony: capped photo and video lists
    Testimony,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AttachmentSet {
    Request(RequestAttachments),
    Testimony(TestimonyAttachments),
}

impl AttachmentSet {
    pub fn items(&self) -> Vec<&MediaItemView> {
        match self {
            AttachmentSet::Request(set) => set.items.iter().collect(),
            AttachmentSet::Testimony(set) => set.photos.iter().chain(set.videos.iter()).collect(),
        }
    }
}

/// Everything one `attach` run produced
#[derive(Debug, Serialize)]
pub struct AttachReport {
    pub mode: Mode,
    pub backend: &'static str,
    pub outcome: AddOutcome,
    pub attachments: AttachmentSet,
    pub notices: Vec<Notice>,
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing(config: &AttachmentConfig) -> anyhow::Result<()> {
    vitrine_infra::init_telemetry("vitrine-cli", &config.environment, config.log_format)
}

/// Guess a content type from the file extension, the way a browser file chooser does.
pub fn guess_content_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(content_type_for_extension)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

pub async fn source_file_for_path(path: &Path) -> anyhow::Result<SourceFile> {
    SourceFile::from_path(path, guess_content_type(path))
        .await
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Attach `paths` to a fresh controller, wait for the uploads and report.
pub async fn run_attach(
    config: &AttachmentConfig,
    mode: Mode,
    paths: &[PathBuf],
) -> anyhow::Result<AttachReport> {
    let probe: Arc<dyn MediaProbe> =
        Arc::new(FfprobeProbe::new(config.ffprobe_path.clone()).context("Invalid ffprobe path")?);
    run_attach_with_probe(config, mode, paths, probe).await
}

pub async fn run_attach_with_probe(
    config: &AttachmentConfig,
    mode: Mode,
    paths: &[PathBuf],
    probe: Arc<dyn MediaProbe>,
) -> anyhow::Result<AttachReport> {
    let uploader = create_uploader(config)
        .await
        .context("Failed to create upload backend")?;
    let backend = uploader.backend_name();
    let notifier = Arc::new(RecordingNotifier::new());
    let ctx = Arc::new(AttachmentContext::new(
        config,
        uploader.clone(),
        Arc::new(PreviewRegistry::new()),
        probe,
        notifier.clone(),
    ));

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(source_file_for_path(path).await?);
    }

    let (outcome, attachments) = match mode {
        Mode::Request => {
            let controller = RequestMediaController::new(ctx);
            let outcome = controller.add(files).await;
            uploader
                .finish_pending()
                .await
                .context("Upload did not complete")?;
            (outcome, AttachmentSet::Request(controller.attachment_set()))
        }
        Mode::Testimony => {
            let controller = TestimonyMediaController::new(ctx);
            let outcome = controller.add(files).await;
            uploader
                .finish_pending()
                .await
                .context("Upload did not complete")?;
            (outcome, AttachmentSet::Testimony(controller.attachment_set()))
        }
    };

    Ok(AttachReport {
        mode,
        backend,
        outcome,
        attachments,
        notices: notifier.drain(),
    })
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Plain-text rendering of a report
pub fn render_table(report: &AttachReport) -> String {
    let mut out = format!(
        "{:<32} {:<6} {:>10} {:>8}\n",
        "FILE", "KIND", "SIZE", "PROGRESS"
    );
    for item in report.attachments.items() {
        out.push_str(&format!(
            "{:<32} {:<6} {:>10} {:>7}%\n",
            truncate_string(&item.file_name, 32),
            item.kind.to_string(),
            format_bytes(item.size_bytes),
            item.progress
        ));
    }
    for notice in &report.notices {
        out.push_str(&format!("[{:?}] {}\n", notice.kind, notice.message));
    }
    out
}
