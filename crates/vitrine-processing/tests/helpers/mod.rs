#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;
use vitrine_core::{AttachmentConfig, Notice, RecordingNotifier, SourceFile};
use vitrine_processing::{
    AttachmentContext, FixedDurationProbe, MediaProbe, ProbeError, RequestMediaController,
    TestimonyMediaController,
};
use vitrine_storage::{MemoryBlobUploader, PreviewRegistry};

/// Collaborators of one form, with probes for assertions
pub struct TestForm {
    pub uploader: Arc<MemoryBlobUploader>,
    pub previews: Arc<PreviewRegistry>,
    pub notifier: Arc<RecordingNotifier>,
    pub ctx: Arc<AttachmentContext>,
}

impl TestForm {
    pub fn request(&self) -> RequestMediaController {
        RequestMediaController::new(self.ctx.clone())
    }

    pub fn testimony(&self) -> TestimonyMediaController {
        TestimonyMediaController::new(self.ctx.clone())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notifier.notices()
    }
}

/// Form with default limits and the given probe
pub fn setup_form(probe: impl MediaProbe + 'static) -> TestForm {
    setup_form_with(AttachmentConfig::default(), probe)
}

pub fn setup_form_with(config: AttachmentConfig, probe: impl MediaProbe + 'static) -> TestForm {
    let uploader = Arc::new(MemoryBlobUploader::new());
    let previews = Arc::new(PreviewRegistry::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let ctx = Arc::new(AttachmentContext::new(
        &config,
        uploader.clone(),
        previews.clone(),
        Arc::new(probe),
        notifier.clone(),
    ));

    TestForm {
        uploader,
        previews,
        notifier,
        ctx,
    }
}

/// Probe where every video in `names` lasts `secs`
pub fn durations(names: &[&str], secs: f64) -> FixedDurationProbe {
    names
        .iter()
        .fold(FixedDurationProbe::new(), |probe, name| {
            probe.with_duration(*name, secs)
        })
}

/// Probe that makes each call wait for a partner call before answering, so two
/// batches are forced to interleave at every duration probe.
pub struct LockstepProbe {
    barrier: Barrier,
    secs: f64,
}

impl LockstepProbe {
    pub fn new(secs: f64) -> Self {
        Self {
            barrier: Barrier::new(2),
            secs,
        }
    }
}

#[async_trait]
impl MediaProbe for LockstepProbe {
    async fn probe_duration(&self, _file: &SourceFile) -> Result<f64, ProbeError> {
        self.barrier.wait().await;
        Ok(self.secs)
    }
}
