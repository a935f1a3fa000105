//! Editing session state kept outside the document: the single current
//! selection, selection notifications and an in-flight drag.

use crate::editing::{Document, MoveError, MoveSource, Patch};
use crate::models::{BlockId, BlockType};

/// Notifications for the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    BlockSelected { id: BlockId },
    SelectionCleared,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    selected: Option<BlockId>,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &BlockId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Change the selection. Emits one event when it actually changes.
    pub fn select(&mut self, id: Option<BlockId>) {
        if self.selected == id {
            return;
        }
        self.events.push(match &id {
            Some(id) => SessionEvent::BlockSelected { id: id.clone() },
            None => SessionEvent::SelectionCleared,
        });
        self.selected = id;
    }

    /// Select the deepest of the blocks under the pointer
    pub fn click(&mut self, doc: &Document, candidates: &[BlockId]) {
        if let Some(id) = hit_test(doc, candidates) {
            self.select(Some(id.clone()));
        }
    }

    /// Drop a selection that no longer exists in `doc`
    pub fn sync(&mut self, doc: &Document) {
        if self
            .selected
            .as_ref()
            .is_some_and(|id| !doc.contains(id.as_str()))
        {
            self.select(None);
        }
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Pick the deepest block among `candidates`. Nested blocks all sit under a
/// pointer at once; the innermost one wins, and among equals the last
/// candidate does. Ids not in the document are ignored.
pub fn hit_test<'a>(doc: &Document, candidates: &'a [BlockId]) -> Option<&'a BlockId> {
    candidates
        .iter()
        .filter_map(|id| doc.depth(id.as_str()).map(|depth| (depth, id)))
        .max_by_key(|(depth, _)| *depth)
        .map(|(_, id)| id)
}

/// Where a drag started
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A block already on the page
    Existing(BlockId),
    /// A palette entry creating a new block
    Palette(BlockType),
}

/// A drag between `begin` and drop
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    source: DragSource,
}

impl DragState {
    pub fn begin(source: DragSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &DragSource {
        &self.source
    }

    /// Finish the drag over `target`. Without a target the drag is
    /// cancelled and the document left alone.
    pub fn drop_on(
        self,
        doc: &mut Document,
        target: Option<&str>,
        index: Option<usize>,
    ) -> Result<Option<Patch>, MoveError> {
        let Some(target) = target else {
            log::debug!("Drag of {:?} cancelled", self.source);
            return Ok(None);
        };
        let source = match self.source {
            DragSource::Existing(id) => MoveSource::Existing(id),
            DragSource::Palette(block_type) => MoveSource::New(block_type),
        };
        doc.move_block(source, target, index).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{grid_page, root_json};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_emits_once_per_change() {
        let (_, ids) = grid_page(2);
        let mut session = Session::new();

        session.select(Some(ids.grid.clone()));
        session.select(Some(ids.grid.clone()));
        session.select(Some(ids.heading.clone()));
        session.select(None);
        session.select(None);

        assert_eq!(
            session.take_events(),
            vec![
                SessionEvent::BlockSelected { id: ids.grid },
                SessionEvent::BlockSelected {
                    id: ids.heading.clone()
                },
                SessionEvent::SelectionCleared,
            ]
        );
        assert!(session.take_events().is_empty());
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_click_selects_deepest_candidate() {
        let (doc, ids) = grid_page(2);
        let root = doc.root().id().clone();
        let mut session = Session::new();

        session.click(&doc, &[root.clone(), ids.heading.clone(), ids.grid.clone()]);

        assert!(session.is_selected(&ids.heading));
        assert_eq!(
            hit_test(&doc, &[root.clone(), "ghost".into()]),
            Some(&root)
        );
        assert_eq!(hit_test(&doc, &[]), None);
    }

    #[test]
    fn test_sync_clears_removed_selection() {
        let (mut doc, ids) = grid_page(2);
        let mut session = Session::new();
        session.select(Some(ids.heading.clone()));
        session.take_events();

        doc.remove_block(ids.grid.as_str()).unwrap();
        session.sync(&doc);

        assert_eq!(session.selected(), None);
        assert_eq!(session.take_events(), vec![SessionEvent::SelectionCleared]);
    }

    #[test]
    fn test_drop_without_target_is_a_no_op() {
        let (mut doc, ids) = grid_page(2);
        let before = root_json(&doc);
        let version = doc.version();

        let drag = DragState::begin(DragSource::Existing(ids.heading.clone()));
        let result = drag.drop_on(&mut doc, None, None).unwrap();

        assert_eq!(result, None);
        assert_eq!(root_json(&doc), before);
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_drop_palette_entry_creates_block() {
        let (mut doc, ids) = grid_page(2);
        let cell = doc.slots(ids.grid.as_str())[1].id.to_string();

        let drag = DragState::begin(DragSource::Palette(BlockType::IMAGE));
        let patch = drag.drop_on(&mut doc, Some(cell.as_str()), None).unwrap().unwrap();

        let image = doc.find_block(patch.block.unwrap().as_str()).unwrap();
        assert_eq!(image.block_type(), &BlockType::IMAGE);
        assert_eq!(doc.slots(ids.grid.as_str())[1].children.len(), 1);
    }

    #[test]
    fn test_drop_existing_block_moves_it() {
        let (mut doc, ids) = grid_page(2);
        let root = doc.root().id().to_string();

        let drag = DragState::begin(DragSource::Existing(ids.heading.clone()));
        drag.drop_on(&mut doc, Some(root.as_str()), Some(0)).unwrap();

        assert_eq!(doc.root().children()[0].id(), &ids.heading);
        doc.check_invariants().unwrap();
    }
}
