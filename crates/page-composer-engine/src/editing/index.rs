//! Location index over the block tree.
//!
//! Maps every attached block to the slot it lives in and every child
//! container to its owning block, so parent lookups and containment checks
//! never need a full tree walk. Paths back to a block are rebuilt by
//! following parents, which costs O(depth).

use std::collections::HashMap;

use crate::models::{Block, BlockId, ChildContainer, ContainerId};

/// A slot blocks can be attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Default slot of a simple container block, backed by its `children`.
    /// Its slot id is the owning block's id.
    Children(BlockId),
    /// A child container of a cardinality block
    Container(ContainerId),
}

impl Slot {
    /// The id move targets use for this slot
    pub fn id(&self) -> &str {
        match self {
            Slot::Children(owner) => owner.as_str(),
            Slot::Container(id) => id.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub slot: Slot,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLocation {
    pub owner: BlockId,
    pub position: usize,
}

/// One step down from a block towards a descendant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Child(usize),
    Contained { position: usize, index: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LocationIndex {
    /// `None` for the root of the indexed tree
    blocks: HashMap<BlockId, Option<BlockLocation>>,
    containers: HashMap<ContainerId, ContainerLocation>,
}

impl LocationIndex {
    /// Index `root` and everything below it. Fails with the first id that
    /// appears twice, block and container ids alike.
    pub fn build(root: &Block) -> Result<Self, String> {
        let mut index = Self::default();
        index.insert_block(root, None)?;
        Ok(index)
    }

    fn insert_block(
        &mut self,
        block: &Block,
        location: Option<BlockLocation>,
    ) -> Result<(), String> {
        if self.contains_id(block.id().as_str()) {
            return Err(block.id().to_string());
        }
        self.blocks.insert(block.id().clone(), location);

        for (index, child) in block.children().iter().enumerate() {
            let slot = Slot::Children(block.id().clone());
            self.insert_block(child, Some(BlockLocation { slot, index }))?;
        }
        for (position, container) in block.containers().iter().enumerate() {
            if self.contains_id(container.id().as_str()) {
                return Err(container.id().to_string());
            }
            self.containers.insert(
                container.id().clone(),
                ContainerLocation {
                    owner: block.id().clone(),
                    position,
                },
            );
            for (index, child) in container.children().iter().enumerate() {
                let slot = Slot::Container(container.id().clone());
                self.insert_block(child, Some(BlockLocation { slot, index }))?;
            }
        }
        Ok(())
    }

    /// Merge the index of a detached subtree. Its root stays unplaced until
    /// the slot it lands in is renumbered.
    pub fn absorb(&mut self, other: LocationIndex) {
        self.blocks.extend(other.blocks);
        self.containers.extend(other.containers);
    }

    /// First id of `other` already present here
    pub fn first_collision<'a>(&self, other: &'a LocationIndex) -> Option<&'a str> {
        other
            .blocks
            .keys()
            .map(BlockId::as_str)
            .chain(other.containers.keys().map(ContainerId::as_str))
            .find(|id| self.contains_id(id))
    }

    /// Forget `block` and its whole subtree
    pub fn remove_subtree(&mut self, block: &Block) {
        block.walk(&mut |b| {
            self.blocks.remove(b.id());
            for container in b.containers() {
                self.containers.remove(container.id());
            }
        });
    }

    /// Forget a container and every block inside it
    pub fn remove_container(&mut self, container: &ChildContainer) {
        self.containers.remove(container.id());
        for child in container.children() {
            self.remove_subtree(child);
        }
    }

    /// Re-point the children of `slot` at their current positions
    pub fn renumber(&mut self, slot: &Slot, children: &[Block]) {
        for (index, child) in children.iter().enumerate() {
            self.blocks.insert(
                child.id().clone(),
                Some(BlockLocation {
                    slot: slot.clone(),
                    index,
                }),
            );
        }
    }

    /// Re-point the containers of `owner` at their current positions
    pub fn renumber_containers(&mut self, owner: &BlockId, containers: &[ChildContainer]) {
        for (position, container) in containers.iter().enumerate() {
            self.containers.insert(
                container.id().clone(),
                ContainerLocation {
                    owner: owner.clone(),
                    position,
                },
            );
        }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.blocks.contains_key(id) || self.containers.contains_key(id)
    }

    pub fn contains_block(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Where `id` is attached. `None` for the root and for unknown ids.
    pub fn location(&self, id: &str) -> Option<&BlockLocation> {
        self.blocks.get(id).and_then(Option::as_ref)
    }

    pub fn container(&self, id: &str) -> Option<&ContainerLocation> {
        self.containers.get(id)
    }

    /// Block owning `slot`
    pub fn owner_of<'a>(&'a self, slot: &'a Slot) -> Option<&'a BlockId> {
        match slot {
            Slot::Children(owner) => Some(owner),
            Slot::Container(id) => self.containers.get(id).map(|c| &c.owner),
        }
    }

    pub fn parent_of(&self, id: &str) -> Option<&BlockId> {
        self.location(id).and_then(|loc| self.owner_of(&loc.slot))
    }

    /// Block ids from the parent of `id` up to the root
    pub fn ancestors(&self, id: &str) -> Vec<&BlockId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent_of(parent.as_str());
        }
        ancestors
    }

    /// Whether `ancestor` is `id` itself or lies above it
    pub fn is_self_or_ancestor(&self, ancestor: &str, id: &str) -> bool {
        id == ancestor || self.ancestors(id).iter().any(|a| a.as_str() == ancestor)
    }

    /// Steps from the root down to `id`
    pub fn path(&self, id: &str) -> Option<Vec<Step>> {
        if !self.contains_block(id) {
            return None;
        }
        let mut steps = Vec::new();
        let mut current = id;
        while let Some(location) = self.location(current) {
            let owner = match &location.slot {
                Slot::Children(owner) => {
                    steps.push(Step::Child(location.index));
                    owner
                }
                Slot::Container(container_id) => {
                    let container = self.containers.get(container_id)?;
                    steps.push(Step::Contained {
                        position: container.position,
                        index: location.index,
                    });
                    &container.owner
                }
            };
            current = owner.as_str();
        }
        steps.reverse();
        Some(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockType, ContainerKind, Properties};
    use pretty_assertions::assert_eq;

    fn block(tag: &'static str) -> Block {
        Block::new(BlockType::from_static(tag), Properties::new())
    }

    /// page > [section > heading, grid > (cell > text, cell)]
    fn sample() -> Block {
        let mut section = block("section");
        section.children.push(block("heading"));

        let mut first = ChildContainer::empty(ContainerKind::CELL, None);
        first.children.push(block("text"));
        let mut grid = block("grid");
        grid.containers.push(first);
        grid.containers.push(ChildContainer::empty(ContainerKind::CELL, None));

        let mut page = block("page");
        page.children.push(section);
        page.children.push(grid);
        page
    }

    #[test]
    fn test_build_indexes_every_block_and_container() {
        let page = sample();
        let index = LocationIndex::build(&page).unwrap();

        assert_eq!(index.block_count(), 5);
        assert!(index.container(page.children[1].containers[1].id.as_str()).is_some());
        assert_eq!(index.location(page.id.as_str()), None);
        assert!(index.contains_block(page.id.as_str()));
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let mut page = sample();
        let copy = page.children[0].clone();
        page.children.push(copy);

        assert_eq!(
            LocationIndex::build(&page),
            Err(page.children[0].id.to_string())
        );
    }

    #[test]
    fn test_owner_of_slots() {
        let page = sample();
        let index = LocationIndex::build(&page).unwrap();
        let grid = &page.children[1];

        let default_slot = Slot::Children(page.id.clone());
        let cell = Slot::Container(grid.containers[0].id.clone());

        assert_eq!(index.owner_of(&default_slot), Some(&page.id));
        assert_eq!(index.owner_of(&cell), Some(&grid.id));
        assert_eq!(index.owner_of(&Slot::Container("ghost".into())), None);
    }

    #[test]
    fn test_parents_and_ancestors() {
        let page = sample();
        let index = LocationIndex::build(&page).unwrap();
        let grid = &page.children[1];
        let text = &grid.containers[0].children[0];

        assert_eq!(index.parent_of(text.id.as_str()), Some(&grid.id));
        assert_eq!(index.ancestors(text.id.as_str()), vec![&grid.id, &page.id]);
        assert!(index.is_self_or_ancestor(page.id.as_str(), text.id.as_str()));
        assert!(!index.is_self_or_ancestor(text.id.as_str(), grid.id.as_str()));
    }

    #[test]
    fn test_path_walks_children_and_containers() {
        let page = sample();
        let index = LocationIndex::build(&page).unwrap();
        let text = &page.children[1].containers[0].children[0];
        let heading = &page.children[0].children[0];

        assert_eq!(
            index.path(text.id.as_str()),
            Some(vec![
                Step::Child(1),
                Step::Contained {
                    position: 0,
                    index: 0
                }
            ])
        );
        assert_eq!(
            index.path(heading.id.as_str()),
            Some(vec![Step::Child(0), Step::Child(0)])
        );
        assert_eq!(index.path(page.id.as_str()), Some(Vec::new()));
        assert_eq!(index.path("missing"), None);
    }

    #[test]
    fn test_remove_subtree_forgets_nested_containers() {
        let page = sample();
        let mut index = LocationIndex::build(&page).unwrap();
        let grid = &page.children[1];

        index.remove_subtree(grid);

        assert_eq!(index.block_count(), 3);
        assert!(!index.contains_id(grid.containers[0].id.as_str()));
        assert!(!index.contains_block(grid.containers[0].children[0].id.as_str()));
    }

    #[test]
    fn test_first_collision() {
        let page = sample();
        let index = LocationIndex::build(&page).unwrap();

        let fresh = LocationIndex::build(&block("divider")).unwrap();
        assert_eq!(index.first_collision(&fresh), None);

        let again = LocationIndex::build(&page.children[0]).unwrap();
        assert!(index.first_collision(&again).is_some());
    }
}
