use vitrine_core::{ItemId, MediaKind};

use super::MediaItem;

/// State change of a [`MediaList`]
#[derive(Debug)]
pub enum ListAction {
    /// Append a committed batch, in order
    Added(Vec<MediaItem>),
    /// Remove the item at `index`; later items shift down
    Removed(usize),
    DescriptionUpdated { index: usize, text: String },
    Progress { id: ItemId, pct: u8 },
}

/// What a reduction did.
///
/// Items leaving the list are handed back rather than dropped so the caller decides
/// where their previews are released (outside any lock it holds).
#[derive(Debug, Default)]
pub struct Transition {
    pub changed: bool,
    pub removed: Option<MediaItem>,
    /// Items trimmed because the list went over capacity
    pub overflow: Vec<MediaItem>,
}

/// An ordered list of attached items
#[derive(Debug)]
pub struct MediaList {
    kind: Option<MediaKind>,
    capacity: Option<usize>,
    describable: bool,
    items: Vec<MediaItem>,
}

impl MediaList {
    /// `kind = None` accepts any media, `capacity = None` is unbounded
    pub fn new(kind: Option<MediaKind>, capacity: Option<usize>, describable: bool) -> Self {
        Self {
            kind,
            capacity,
            describable,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        self.kind
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_describable(&self) -> bool {
        self.describable
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Free slots, or `None` when unbounded
    pub fn remaining(&self) -> Option<usize> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.items.len()))
    }

    pub fn reduce(mut self, action: ListAction) -> (Self, Transition) {
        let transition = self.apply(action);
        (self, transition)
    }

    pub fn apply(&mut self, action: ListAction) -> Transition {
        match action {
            ListAction::Added(batch) => {
                let changed = !batch.is_empty();
                self.items.extend(batch);
                let overflow = match self.capacity {
                    Some(capacity) if self.items.len() > capacity => self.items.split_off(capacity),
                    _ => Vec::new(),
                };
                Transition {
                    changed,
                    removed: None,
                    overflow,
                }
            }
            ListAction::Removed(index) => {
                if index >= self.items.len() {
                    return Transition::default();
                }
                Transition {
                    changed: true,
                    removed: Some(self.items.remove(index)),
                    overflow: Vec::new(),
                }
            }
            ListAction::DescriptionUpdated { index, text } => {
                let changed = match self.items.get_mut(index) {
                    Some(item) if self.describable => item.set_description(text),
                    _ => false,
                };
                Transition {
                    changed,
                    ..Transition::default()
                }
            }
            ListAction::Progress { id, pct } => {
                let changed = self
                    .items
                    .iter_mut()
                    .find(|item| item.id() == id)
                    .map(|item| item.set_progress(pct))
                    .unwrap_or(false);
                Transition {
                    changed,
                    ..Transition::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::test_support::{item, photo, video};
    use std::sync::Arc;
    use vitrine_storage::PreviewRegistry;

    fn names(list: &MediaList) -> Vec<&str> {
        list.items().iter().map(|i| i.file_name()).collect()
    }

    #[test]
    fn test_added_preserves_order() {
        let previews = Arc::new(PreviewRegistry::new());
        let list = MediaList::new(None, None, false);

        let (list, t) = list.reduce(ListAction::Added(vec![
            item(&previews, photo("a.jpg"), false),
            item(&previews, video("b.mp4"), false),
        ]));
        assert!(t.changed);
        let (list, _) = list.reduce(ListAction::Added(vec![item(&previews, photo("c.jpg"), false)]));

        assert_eq!(names(&list), vec!["a.jpg", "b.mp4", "c.jpg"]);
        assert_eq!(list.remaining(), None);
    }

    #[test]
    fn test_added_trims_overflow() {
        let previews = Arc::new(PreviewRegistry::new());
        let mut list = MediaList::new(Some(MediaKind::Video), Some(3), true);

        list.apply(ListAction::Added(vec![
            item(&previews, video("1.mp4"), true),
            item(&previews, video("2.mp4"), true),
        ]));
        let t = list.apply(ListAction::Added(vec![
            item(&previews, video("3.mp4"), true),
            item(&previews, video("4.mp4"), true),
        ]));

        assert_eq!(list.len(), 3);
        assert_eq!(list.remaining(), Some(0));
        assert_eq!(t.overflow.len(), 1);
        assert_eq!(t.overflow[0].file_name(), "4.mp4");

        // the trimmed item keeps its preview until the caller drops it
        assert_eq!(previews.live_count(), 4);
        drop(t);
        assert_eq!(previews.live_count(), 3);
    }

    #[test]
    fn test_removed_shifts_and_releases_on_drop() {
        let previews = Arc::new(PreviewRegistry::new());
        let mut list = MediaList::new(None, None, false);
        list.apply(ListAction::Added(vec![
            item(&previews, photo("a.jpg"), false),
            item(&previews, photo("b.jpg"), false),
            item(&previews, photo("c.jpg"), false),
        ]));

        let t = list.apply(ListAction::Removed(1));
        let removed = t.removed.expect("item removed");
        assert_eq!(removed.file_name(), "b.jpg");
        assert_eq!(names(&list), vec!["a.jpg", "c.jpg"]);

        let preview = removed.preview().reference().clone();
        drop(removed);
        assert_eq!(previews.release_count(&preview), 1);
        assert_eq!(previews.live_count(), 2);
    }

    #[test]
    fn test_removed_out_of_range_is_noop() {
        let previews = Arc::new(PreviewRegistry::new());
        let mut list = MediaList::new(None, None, false);
        list.apply(ListAction::Added(vec![item(&previews, photo("a.jpg"), false)]));

        let t = list.apply(ListAction::Removed(5));
        assert!(!t.changed);
        assert!(t.removed.is_none());
        assert_eq!(list.len(), 1);
        assert_eq!(previews.total_releases(), 0);
    }

    #[test]
    fn test_description_updates_only_target() {
        let previews = Arc::new(PreviewRegistry::new());
        let mut list = MediaList::new(Some(MediaKind::Image), Some(5), true);
        list.apply(ListAction::Added(vec![
            item(&previews, photo("a.jpg"), true),
            item(&previews, photo("b.jpg"), true),
        ]));

        let t = list.apply(ListAction::DescriptionUpdated {
            index: 1,
            text: "Oak table, finished".to_string(),
        });
        assert!(t.changed);
        assert_eq!(list.get(0).and_then(|i| i.description()), Some(""));
        assert_eq!(
            list.get(1).and_then(|i| i.description()),
            Some("Oak table, finished")
        );

        let t = list.apply(ListAction::DescriptionUpdated {
            index: 2,
            text: "nobody".to_string(),
        });
        assert!(!t.changed);
    }

    #[test]
    fn test_description_ignored_for_plain_list() {
        let previews = Arc::new(PreviewRegistry::new());
        let mut list = MediaList::new(None, None, false);
        list.apply(ListAction::Added(vec![item(&previews, photo("a.jpg"), false)]));

        let t = list.apply(ListAction::DescriptionUpdated {
            index: 0,
            text: "ignored".to_string(),
        });
        assert!(!t.changed);
        assert_eq!(list.get(0).and_then(|i| i.description()), None);
    }

    #[test]
    fn test_progress_by_id() {
        let previews = Arc::new(PreviewRegistry::new());
        let mut list = MediaList::new(None, None, false);
        let first = item(&previews, photo("a.jpg"), false);
        let id = first.id();
        list.apply(ListAction::Added(vec![first, item(&previews, photo("b.jpg"), false)]));

        assert!(list.apply(ListAction::Progress { id, pct: 55 }).changed);
        assert_eq!(list.get(0).map(|i| i.progress()), Some(55));
        assert_eq!(list.get(1).map(|i| i.progress()), Some(0));

        assert!(!list.apply(ListAction::Progress { id: ItemId::new(), pct: 10 }).changed);
        assert!(!list.contains(ItemId::new()));
        assert!(list.contains(id));
    }
}
