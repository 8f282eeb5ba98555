//! Scoped ownership of preview references

use std::fmt;
use std::sync::Arc;

use vitrine_core::SourceFile;
use vitrine_storage::{PreviewFacility, PreviewRef};

/// A preview reference that is released when dropped.
///
/// Allocation and release are paired by construction: the only way to get an
/// `OwnedPreview` is [`OwnedPreview::acquire`], it cannot be cloned, and `Drop`
/// runs exactly once.
pub struct OwnedPreview {
    facility: Arc<dyn PreviewFacility>,
    reference: PreviewRef,
}

impl OwnedPreview {
    pub fn acquire(facility: Arc<dyn PreviewFacility>, file: &SourceFile) -> Self {
        let reference = facility.allocate(file);
        Self {
            facility,
            reference,
        }
    }

    pub fn reference(&self) -> &PreviewRef {
        &self.reference
    }
}

impl fmt::Debug for OwnedPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedPreview")
            .field("reference", &self.reference)
            .finish()
    }
}

impl Drop for OwnedPreview {
    fn drop(&mut self) {
        self.facility.release(&self.reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_storage::PreviewRegistry;

    #[test]
    fn test_release_on_drop_exactly_once() {
        let registry = Arc::new(PreviewRegistry::new());
        let file = SourceFile::from_bytes("a.jpg", "image/jpeg", vec![1, 2]);

        let preview = OwnedPreview::acquire(registry.clone(), &file);
        let reference = preview.reference().clone();
        assert!(registry.is_live(&reference));

        drop(preview);
        assert!(!registry.is_live(&reference));
        assert_eq!(registry.release_count(&reference), 1);
    }

    #[test]
    fn test_moving_does_not_release() {
        let registry = Arc::new(PreviewRegistry::new());
        let file = SourceFile::from_bytes("a.jpg", "image/jpeg", vec![1]);

        let previews: Vec<OwnedPreview> = (0..3)
            .map(|_| OwnedPreview::acquire(registry.clone(), &file))
            .collect();
        let moved: Vec<OwnedPreview> = previews.into_iter().collect();
        assert_eq!(registry.live_count(), 3);
        assert_eq!(registry.total_releases(), 0);

        drop(moved);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.total_releases(), 3);
    }
}
