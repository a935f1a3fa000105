//! Move/reparent engine and the other structural edits.
//!
//! A move names a source (an existing block, a type tag, or a detached
//! block) and a target slot id: a container id, or the id of a simple
//! container block for its default slot. Everything is validated before
//! the tree is touched, so a rejected move leaves the document exactly as
//! it was.

use crate::blocks::{ContainerPlan, ReconcileDiff, RegistryError, Warning};
use crate::editing::document::{check_shape, slot_children_mut};
use crate::editing::index::{BlockLocation, LocationIndex, Slot};
use crate::editing::{Document, EditError, Patch};
use crate::io::TreeError;
use crate::models::{Block, BlockId, BlockType, Properties};

/// What a move puts into the target slot
#[derive(Debug, Clone, PartialEq)]
pub enum MoveSource {
    /// Relocate a block already in the tree
    Existing(BlockId),
    /// Create a block of this type with default properties
    New(BlockType),
    /// Attach a block built elsewhere, e.g. by
    /// [`Registry::create_with`](crate::blocks::Registry::create_with)
    Detached(Block),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoveError {
    #[error("Target slot not found: {0}")]
    TargetNotFound(String),
    #[error("Block {0} does not take children directly")]
    NotAContainer(String),
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("The root block cannot be moved")]
    RootNotMovable,
    #[error("Cannot move block {0} into itself or one of its descendants")]
    Cycle(BlockId),
    #[error("Index {index} is past the end of a slot holding {len} blocks")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Id already present in the document: {0}")]
    DuplicateId(String),
    #[error("Malformed block: {0}")]
    Malformed(String),
    #[error(transparent)]
    UnknownBlockType(#[from] RegistryError),
}

impl Document {
    /// Move `source` into the slot `target`.
    ///
    /// Without `index` the block is appended. An explicit index is read
    /// after the block has left its current slot, so moving within one slot
    /// to `len - 1` puts it last.
    pub fn move_block(
        &mut self,
        source: MoveSource,
        target: &str,
        index: Option<usize>,
    ) -> Result<Patch, MoveError> {
        let slot = self.resolve_slot(target)?;
        let patch = match source {
            MoveSource::Existing(id) => self.relocate(&id, slot, index)?,
            MoveSource::New(block_type) => {
                let block = self.registry.create_with(
                    block_type.as_str(),
                    Properties::new(),
                    &self.options,
                )?;
                self.attach(block, slot, index)?
            }
            MoveSource::Detached(block) => self.attach(block, slot, index)?,
        };
        Ok(self.commit(patch))
    }

    /// Detach block `id` with its subtree and hand it back
    pub fn remove_block(&mut self, id: &str) -> Result<Block, EditError> {
        self.remove_with_patch(id).map(|(block, _)| block)
    }

    pub(crate) fn remove_with_patch(&mut self, id: &str) -> Result<(Block, Patch), EditError> {
        let location = self.attached_location(id)?;
        let block = self
            .take(&location)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?;
        self.index.remove_subtree(&block);

        log::debug!(
            "Removed {} {} with {} block(s)",
            block.block_type(),
            block.id(),
            block.subtree_len()
        );
        let patch = Patch {
            block: Some(block.id().clone()),
            changed: vec![location.slot.id().to_string()],
            ..Patch::default()
        };
        Ok((block, self.commit(patch)))
    }

    /// Deep copy block `id` with fresh ids and insert it right after the
    /// original. The patch names the copy.
    pub fn duplicate_block(&mut self, id: &str) -> Result<Patch, EditError> {
        let location = self.attached_location(id)?;
        let copy = self
            .find_block(id)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?
            .clone_with_fresh_ids();
        let fresh = LocationIndex::build(&copy).map_err(MoveError::DuplicateId)?;
        let copy_id = copy.id().clone();

        self.index.absorb(fresh);
        if let Err(copy) = self.place(copy, &location.slot, location.index + 1) {
            self.index.remove_subtree(&copy);
            return Err(EditError::BlockNotFound(id.to_string()));
        }

        log::debug!("Duplicated {id} as {copy_id}");
        let patch = Patch {
            block: Some(copy_id),
            changed: vec![location.slot.id().to_string()],
            ..Patch::default()
        };
        Ok(self.commit(patch))
    }

    fn attached_location(&self, id: &str) -> Result<BlockLocation, EditError> {
        match self.index.location(id) {
            Some(location) => Ok(location.clone()),
            None if self.contains(id) => Err(EditError::RootBlock),
            None => Err(EditError::BlockNotFound(id.to_string())),
        }
    }

    /// Map a target id to a slot. Container ids are tried before block ids.
    fn resolve_slot(&self, target: &str) -> Result<Slot, MoveError> {
        if self.index.container(target).is_some() {
            return Ok(Slot::Container(target.into()));
        }
        let block = self
            .find_block(target)
            .ok_or_else(|| MoveError::TargetNotFound(target.to_string()))?;
        match self.plan_of(block) {
            ContainerPlan::Children => Ok(Slot::Children(block.id().clone())),
            _ => Err(MoveError::NotAContainer(target.to_string())),
        }
    }

    fn slot_len(&self, slot: &Slot) -> Result<usize, MoveError> {
        self.slot_children(slot)
            .map(Vec::len)
            .ok_or_else(|| MoveError::TargetNotFound(slot.id().to_string()))
    }

    fn relocate(
        &mut self,
        id: &BlockId,
        target: Slot,
        index: Option<usize>,
    ) -> Result<Patch, MoveError> {
        let from = match self.index.location(id.as_str()) {
            Some(location) => location.clone(),
            None if self.contains(id.as_str()) => return Err(MoveError::RootNotMovable),
            None => return Err(MoveError::BlockNotFound(id.clone())),
        };
        let owner = self
            .index
            .owner_of(&target)
            .ok_or_else(|| MoveError::TargetNotFound(target.id().to_string()))?;
        if self.index.is_self_or_ancestor(id.as_str(), owner.as_str()) {
            return Err(MoveError::Cycle(id.clone()));
        }
        let len = self.slot_len(&target)? - usize::from(from.slot == target);
        let at = insertion_index(index, len)?;

        let block = self
            .take(&from)
            .ok_or_else(|| MoveError::BlockNotFound(id.clone()))?;
        if let Err(block) = self.place(block, &target, at) {
            // Put it back where it came from rather than lose it
            if let Err(block) = self.place(block, &from.slot, from.index) {
                self.index.remove_subtree(&block);
            }
            return Err(MoveError::TargetNotFound(target.id().to_string()));
        }

        log::debug!("Moved {id} from {} to {} at {at}", from.slot.id(), target.id());
        let mut changed = vec![from.slot.id().to_string()];
        if from.slot != target {
            changed.push(target.id().to_string());
        }
        Ok(Patch {
            block: Some(id.clone()),
            changed,
            ..Patch::default()
        })
    }

    fn attach(
        &mut self,
        mut block: Block,
        slot: Slot,
        index: Option<usize>,
    ) -> Result<Patch, MoveError> {
        check_shape(&self.registry, &self.options, &block, false).map_err(|err| match err {
            TreeError::UnknownBlockType(tag) => RegistryError::UnknownBlockType(tag).into(),
            other => MoveError::Malformed(other.to_string()),
        })?;
        let mut reconciled = Vec::new();
        self.resolve_subtree(&mut block, &mut reconciled)?;

        let fresh = LocationIndex::build(&block).map_err(MoveError::DuplicateId)?;
        if let Some(id) = self.index.first_collision(&fresh) {
            return Err(MoveError::DuplicateId(id.to_string()));
        }
        let at = insertion_index(index, self.slot_len(&slot)?)?;
        let id = block.id().clone();

        self.index.absorb(fresh);
        if let Err(block) = self.place(block, &slot, at) {
            self.index.remove_subtree(&block);
            return Err(MoveError::TargetNotFound(slot.id().to_string()));
        }

        log::debug!("Inserted {id} into {} at {at}", slot.id());
        let warnings: Vec<Warning> = reconciled.iter().filter_map(ReconcileDiff::warning).collect();
        for warning in &warnings {
            log::warn!("{warning}");
        }
        Ok(Patch {
            block: Some(id),
            changed: vec![slot.id().to_string()],
            reconciled,
            warnings,
            ..Patch::default()
        })
    }

    /// Bring the containers of every cardinality block under `block` in
    /// line with its properties, parents first
    fn resolve_subtree(
        &self,
        block: &mut Block,
        diffs: &mut Vec<ReconcileDiff>,
    ) -> Result<(), MoveError> {
        let diff = self.registry.resolve_containers(block, &self.options)?;
        if !diff.is_empty() {
            diffs.push(diff);
        }
        let children = block
            .children
            .iter_mut()
            .chain(block.containers.iter_mut().flat_map(|c| c.children.iter_mut()));
        for child in children {
            self.resolve_subtree(child, diffs)?;
        }
        Ok(())
    }

    /// Splice the block at `from` out of its slot
    fn take(&mut self, from: &BlockLocation) -> Option<Block> {
        let siblings = slot_children_mut(&mut self.root, &self.index, &from.slot)?;
        if from.index >= siblings.len() {
            return None;
        }
        let block = siblings.remove(from.index);
        self.index.renumber(&from.slot, siblings);
        Some(block)
    }

    /// Splice `block` into `slot` at `at`. Hands the block back if the slot
    /// cannot be reached.
    fn place(&mut self, block: Block, slot: &Slot, at: usize) -> Result<(), Block> {
        match slot_children_mut(&mut self.root, &self.index, slot) {
            Some(siblings) => {
                siblings.insert(at.min(siblings.len()), block);
                self.index.renumber(slot, siblings);
                Ok(())
            }
            None => Err(block),
        }
    }
}

fn insertion_index(index: Option<usize>, len: usize) -> Result<usize, MoveError> {
    match index {
        None => Ok(len),
        Some(index) if index <= len => Ok(index),
        Some(index) => Err(MoveError::IndexOutOfBounds { index, len }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Cmd;
    use crate::tests::{grid_page, registry, root_json};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn page_with(tags: &[&str]) -> (Document, Vec<BlockId>) {
        let mut doc = Document::new(registry()).unwrap();
        let root = doc.root().id().to_string();
        let ids = tags
            .iter()
            .map(|tag| {
                doc.move_block(MoveSource::New((*tag).into()), &root, None)
                    .unwrap()
                    .block
                    .unwrap()
            })
            .collect();
        (doc, ids)
    }

    fn child_ids(block: &Block) -> Vec<&BlockId> {
        block.children().iter().map(Block::id).collect()
    }

    fn occurrences(doc: &Document, id: &BlockId) -> usize {
        let mut count = 0;
        doc.root().walk(&mut |b| {
            if b.id() == id {
                count += 1;
            }
        });
        count
    }

    #[test]
    fn test_new_block_lands_in_exactly_one_slot() {
        let (mut doc, ids) = grid_page(3);
        let root = doc.root().id().to_string();
        let text = doc
            .apply(Cmd::AddBlock {
                block_type: "text".into(),
                target: root,
                index: None,
                properties: Properties::new(),
            })
            .unwrap()
            .block
            .unwrap();
        let second_cell = doc.slots(ids.grid.as_str())[1].id.to_string();

        doc.move_block(MoveSource::Existing(text.clone()), &second_cell, None)
            .unwrap();

        assert_eq!(occurrences(&doc, &text), 1);
        assert_eq!(doc.parent_of(text.as_str()).map(Block::id), Some(&ids.grid));
        assert_eq!(doc.root().children().len(), 1);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_move_into_own_descendant_leaves_tree_untouched() {
        let (mut doc, ids) = page_with(&["container"]);
        let container = ids[0].clone();
        let grid = doc
            .move_block(MoveSource::New(BlockType::GRID), container.as_str(), None)
            .unwrap()
            .block
            .unwrap();
        let cell = doc.slots(grid.as_str())[0].id.to_string();
        let before = root_json(&doc);
        let version = doc.version();

        let err = doc
            .move_block(MoveSource::Existing(container.clone()), &cell, None)
            .unwrap_err();

        assert_eq!(err, MoveError::Cycle(container));
        assert_eq!(root_json(&doc), before);
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_move_into_itself_is_a_cycle() {
        let (mut doc, ids) = page_with(&["section"]);
        let err = doc
            .move_block(MoveSource::Existing(ids[0].clone()), ids[0].as_str(), None)
            .unwrap_err();
        assert_eq!(err, MoveError::Cycle(ids[0].clone()));
    }

    #[test]
    fn test_root_cannot_move() {
        let (mut doc, ids) = page_with(&["section"]);
        let root = doc.root().id().clone();
        let err = doc
            .move_block(MoveSource::Existing(root), ids[0].as_str(), None)
            .unwrap_err();
        assert_eq!(err, MoveError::RootNotMovable);
    }

    #[rstest]
    #[case::existing(true)]
    #[case::new(false)]
    fn test_missing_target(#[case] existing: bool) {
        let (mut doc, ids) = page_with(&["heading"]);
        let source = if existing {
            MoveSource::Existing(ids[0].clone())
        } else {
            MoveSource::New(BlockType::TEXT)
        };
        let before = root_json(&doc);

        let err = doc.move_block(source, "nowhere", None).unwrap_err();

        assert_eq!(err, MoveError::TargetNotFound("nowhere".to_string()));
        assert_eq!(root_json(&doc), before);
    }

    #[test]
    fn test_leaf_and_cardinality_blocks_are_not_targets() {
        let (mut doc, ids) = grid_page(2);

        let into_leaf = doc
            .move_block(MoveSource::New(BlockType::TEXT), ids.heading.as_str(), None)
            .unwrap_err();
        let into_grid = doc
            .move_block(MoveSource::New(BlockType::TEXT), ids.grid.as_str(), None)
            .unwrap_err();

        assert_eq!(into_leaf, MoveError::NotAContainer(ids.heading.to_string()));
        assert_eq!(into_grid, MoveError::NotAContainer(ids.grid.to_string()));
    }

    #[test]
    fn test_unknown_source_block() {
        let (mut doc, _) = page_with(&[]);
        let root = doc.root().id().to_string();
        let err = doc
            .move_block(MoveSource::Existing("ghost".into()), &root, None)
            .unwrap_err();
        assert_eq!(err, MoveError::BlockNotFound("ghost".into()));
    }

    #[test]
    fn test_unknown_type_source_has_no_effect() {
        let (mut doc, _) = page_with(&["heading"]);
        let root = doc.root().id().to_string();
        let before = root_json(&doc);

        let err = doc
            .move_block(MoveSource::New("marquee".into()), &root, None)
            .unwrap_err();

        assert_eq!(
            err,
            MoveError::UnknownBlockType(RegistryError::UnknownBlockType("marquee".into()))
        );
        assert_eq!(root_json(&doc), before);
    }

    #[test]
    fn test_index_is_read_after_removal() {
        let (mut doc, ids) = page_with(&["heading", "text", "button"]);
        let root = doc.root().id().to_string();

        doc.move_block(MoveSource::Existing(ids[0].clone()), &root, Some(2))
            .unwrap();
        assert_eq!(child_ids(doc.root()), vec![&ids[1], &ids[2], &ids[0]]);

        let err = doc
            .move_block(MoveSource::Existing(ids[0].clone()), &root, Some(3))
            .unwrap_err();
        assert_eq!(err, MoveError::IndexOutOfBounds { index: 3, len: 2 });
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_explicit_index_in_another_slot() {
        let (mut doc, ids) = page_with(&["section", "heading", "text"]);
        let section = ids[0].as_str();
        doc.move_block(MoveSource::Existing(ids[1].clone()), section, None)
            .unwrap();

        doc.move_block(MoveSource::Existing(ids[2].clone()), section, Some(0))
            .unwrap();

        let section = doc.find_block(section).unwrap();
        assert_eq!(child_ids(section), vec![&ids[2], &ids[1]]);
        assert_eq!(child_ids(doc.root()), vec![&ids[0]]);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_moving_preserves_subtree_and_sibling_order() {
        let (mut doc, ids) = page_with(&["heading", "section", "text"]);
        let grid = doc
            .move_block(MoveSource::New(BlockType::GRID), ids[1].as_str(), None)
            .unwrap()
            .block
            .unwrap();
        let cell = doc.slots(grid.as_str())[0].id.to_string();
        doc.move_block(MoveSource::New(BlockType::IMAGE), &cell, None)
            .unwrap();
        let root = doc.root().id().to_string();

        doc.move_block(MoveSource::Existing(grid.clone()), &root, Some(0))
            .unwrap();

        assert_eq!(
            child_ids(doc.root()),
            vec![&grid, &ids[0], &ids[1], &ids[2]]
        );
        assert_eq!(doc.find_block(grid.as_str()).unwrap().subtree_len(), 2);
        assert_eq!(doc.depth(grid.as_str()), Some(1));
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_detached_block_with_taken_id_is_rejected() {
        let (mut doc, ids) = grid_page(1);
        let copy = doc.find_block(ids.heading.as_str()).unwrap().clone();
        let root = doc.root().id().to_string();

        let err = doc
            .move_block(MoveSource::Detached(copy), &root, None)
            .unwrap_err();

        assert_eq!(err, MoveError::DuplicateId(ids.heading.to_string()));
    }

    fn detached(value: serde_json::Value) -> Block {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_detached_leaf_with_children_is_rejected() {
        let (mut doc, _) = page_with(&[]);
        let root = doc.root().id().to_string();
        let before = root_json(&doc);
        let block = detached(serde_json::json!({
            "id": "h",
            "type": "heading",
            "children": [{"id": "t", "type": "text"}]
        }));

        let err = doc
            .move_block(MoveSource::Detached(block), &root, None)
            .unwrap_err();

        assert!(
            matches!(&err, MoveError::Malformed(reason) if reason.contains("cannot have children")),
            "{err}"
        );
        assert_eq!(root_json(&doc), before);
        assert_eq!(doc.version(), 0);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_detached_block_of_unknown_nested_type_is_rejected() {
        let (mut doc, _) = page_with(&[]);
        let root = doc.root().id().to_string();
        let block = detached(serde_json::json!({
            "id": "s",
            "type": "section",
            "children": [{"id": "m", "type": "marquee"}]
        }));

        let err = doc
            .move_block(MoveSource::Detached(block), &root, None)
            .unwrap_err();

        assert_eq!(
            err,
            MoveError::UnknownBlockType(RegistryError::UnknownBlockType("marquee".into()))
        );
    }

    #[test]
    fn test_detached_grid_gets_containers_before_attaching() {
        let (mut doc, _) = page_with(&[]);
        let root = doc.root().id().to_string();
        let block = detached(serde_json::json!({
            "id": "s",
            "type": "section",
            "children": [{"id": "g", "type": "grid", "properties": {"cellCount": 3}}]
        }));

        let patch = doc
            .move_block(MoveSource::Detached(block), &root, None)
            .unwrap();

        assert_eq!(doc.slots("g").len(), 3);
        assert_eq!(patch.reconciled.len(), 1);
        assert_eq!(patch.reconciled[0].added.len(), 3);
        assert!(patch.warnings.is_empty());
        doc.check_invariants().unwrap();

        let cell = doc.slots("g")[1].id.to_string();
        let text = doc
            .move_block(MoveSource::New(BlockType::TEXT), &cell, None)
            .unwrap()
            .block
            .unwrap();
        assert_eq!(
            doc.parent_of(text.as_str()).map(|b| b.id().as_str()),
            Some("g")
        );
    }

    #[test]
    fn test_detached_block_keeps_its_properties() {
        let (mut doc, _) = page_with(&[]);
        let root = doc.root().id().to_string();
        let block = doc
            .registry()
            .create_with(
                "heading",
                Properties::from([("text".to_string(), serde_json::json!("Hi"))]),
                doc.options(),
            )
            .unwrap();

        let id = doc
            .move_block(MoveSource::Detached(block), &root, None)
            .unwrap()
            .block
            .unwrap();

        assert_eq!(
            doc.find_block(id.as_str()).unwrap().str_property("text"),
            Some("Hi")
        );
    }

    #[test]
    fn test_remove_block_destroys_subtree() {
        let (mut doc, ids) = grid_page(2);

        let removed = doc.remove_block(ids.grid.as_str()).unwrap();

        assert_eq!(removed.subtree_len(), 2);
        assert_eq!(doc.block_count(), 1);
        assert!(!doc.contains(ids.heading.as_str()));
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_root_cannot_be_removed_or_duplicated() {
        let (mut doc, _) = grid_page(2);
        let root = doc.root().id().to_string();

        assert_eq!(doc.remove_block(&root).unwrap_err(), EditError::RootBlock);
        assert_eq!(doc.duplicate_block(&root).unwrap_err(), EditError::RootBlock);
        assert_eq!(
            doc.remove_block("ghost").unwrap_err(),
            EditError::BlockNotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_duplicate_inserts_fresh_copy_after_original() {
        let (mut doc, ids) = page_with(&["heading", "text"]);
        let root = doc.root().id().to_string();
        let grid = doc
            .move_block(MoveSource::New(BlockType::GRID), &root, Some(1))
            .unwrap()
            .block
            .unwrap();
        let cell = doc.slots(grid.as_str())[0].id.to_string();
        doc.move_block(MoveSource::New(BlockType::BUTTON), &cell, None)
            .unwrap();

        let copy = doc.duplicate_block(grid.as_str()).unwrap().block.unwrap();

        assert_eq!(
            child_ids(doc.root()),
            vec![&ids[0], &grid, &copy, &ids[1]]
        );
        let original = doc.find_block(grid.as_str()).unwrap();
        let duplicate = doc.find_block(copy.as_str()).unwrap();
        assert_eq!(duplicate.subtree_len(), original.subtree_len());
        assert_ne!(duplicate.containers()[0].id(), original.containers()[0].id());
        assert_eq!(doc.block_count(), 7);
        doc.check_invariants().unwrap();
    }
}
