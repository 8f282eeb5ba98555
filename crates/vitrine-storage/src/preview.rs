//! Transient preview references
//!
//! A preview reference lets the form render a selected file before (or independent
//! of) its upload. The host keeps the bytes alive until the reference is released,
//! so every allocation must be paired with exactly one release.

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitrine_core::constants::PREVIEW_URL_PREFIX;
use vitrine_core::SourceFile;

/// A locally dereferenceable preview URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PreviewRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Host facility that allocates and releases preview references.
///
/// Releasing the same reference twice is a caller bug; implementations are not
/// required to detect it.
pub trait PreviewFacility: Send + Sync {
    fn allocate(&self, file: &SourceFile) -> PreviewRef;

    fn release(&self, preview: &PreviewRef);
}

#[derive(Default)]
struct RegistryState {
    live: HashMap<PreviewRef, String>,
    releases: HashMap<PreviewRef, usize>,
    allocations: usize,
}

/// In-memory preview table with release probes
#[derive(Default)]
pub struct PreviewRegistry {
    state: Mutex<RegistryState>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of references allocated and not yet released
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_live(&self, preview: &PreviewRef) -> bool {
        self.lock().live.contains_key(preview)
    }

    /// How many times `preview` has been released
    pub fn release_count(&self, preview: &PreviewRef) -> usize {
        self.lock().releases.get(preview).copied().unwrap_or(0)
    }

    pub fn total_releases(&self) -> usize {
        self.lock().releases.values().sum()
    }

    pub fn total_allocations(&self) -> usize {
        self.lock().allocations
    }

    /// File name a live reference was allocated for
    pub fn file_name(&self, preview: &PreviewRef) -> Option<String> {
        self.lock().live.get(preview).cloned()
    }
}

impl PreviewFacility for PreviewRegistry {
    fn allocate(&self, file: &SourceFile) -> PreviewRef {
        let preview = PreviewRef::new(format!("{}{}", PREVIEW_URL_PREFIX, Uuid::new_v4()));
        let mut state = self.lock();
        state.allocations += 1;
        state.live.insert(preview.clone(), file.name().to_string());

        tracing::debug!(preview = %preview, file_name = %file.name(), "Allocated preview reference");
        preview
    }

    fn release(&self, preview: &PreviewRef) {
        let mut state = self.lock();
        let was_live = state.live.remove(preview).is_some();
        *state.releases.entry(preview.clone()).or_insert(0) += 1;

        if was_live {
            tracing::debug!(preview = %preview, "Released preview reference");
        } else {
            tracing::warn!(preview = %preview, "Preview reference released more than once or never allocated");
        }
    }
}
