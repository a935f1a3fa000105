use std::sync::Arc;

use crate::blocks::containers::{self, Reconciled};
use crate::blocks::{self, ContainerPlan, EngineOptions, Registry, RegistryError, SlotRef};
use crate::editing::index::{LocationIndex, Slot, Step};
use crate::editing::{EditError, Patch};
use crate::io::TreeError;
use crate::models::{Block, BlockId, BlockType, Properties};

/// The page being edited.
///
/// Owns the root `page` block together with the location index that mirrors
/// it. Every mutation goes through [`Document::apply`] or one of the typed
/// entry points (`move_block`, `update_properties`, `remove_block`,
/// `duplicate_block`, `reconcile`), each of which validates before touching
/// the tree, keeps the index in step and bumps the version.
///
/// ```rust
/// # use std::sync::Arc;
/// # use page_composer_engine::blocks::Registry;
/// # use page_composer_engine::editing::{Document, MoveSource};
/// let mut doc = Document::new(Arc::new(Registry::builtin())).unwrap();
/// let root = doc.root().id().clone();
///
/// let patch = doc
///     .move_block(MoveSource::New("heading".into()), root.as_str(), None)
///     .unwrap();
/// assert_eq!(patch.version, 1);
/// assert_eq!(doc.root().children().len(), 1);
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) root: Block,
    pub(crate) registry: Arc<Registry>,
    pub(crate) options: EngineOptions,
    pub(crate) index: LocationIndex,
    /// Incremented on each successful edit
    pub(crate) version: u64,
}

impl Document {
    /// An empty page with default engine options
    pub fn new(registry: Arc<Registry>) -> Result<Self, RegistryError> {
        Self::with_options(registry, EngineOptions::default())
    }

    pub fn with_options(
        registry: Arc<Registry>,
        options: EngineOptions,
    ) -> Result<Self, RegistryError> {
        let root = registry.create_with(BlockType::PAGE.as_str(), Properties::new(), &options)?;
        Ok(Self {
            index: LocationIndex::build(&root).unwrap_or_default(),
            root,
            registry,
            options,
            version: 0,
        })
    }

    /// Adopt an already built tree. Shapes are checked against the registry
    /// and cardinality blocks are reconciled; the result starts at version 0.
    pub fn from_root(
        root: Block,
        registry: Arc<Registry>,
        options: EngineOptions,
    ) -> Result<Self, TreeError> {
        if root.block_type() != &BlockType::PAGE {
            return Err(TreeError::MalformedTree(format!(
                "root must be a page block, found {}",
                root.block_type()
            )));
        }
        check_shape(&registry, &options, &root, false)?;
        let index = LocationIndex::build(&root)
            .map_err(|id| TreeError::MalformedTree(format!("duplicate id {id}")))?;

        let mut doc = Self {
            root,
            registry,
            options,
            index,
            version: 0,
        };

        let mut cardinality = Vec::new();
        doc.root.walk(&mut |block| {
            if uses_containers(&doc.registry, &doc.options, block) {
                cardinality.push(block.id().clone());
            }
        });
        // Parents come first; skip blocks a parent's reconcile already dropped
        for id in cardinality {
            if doc.contains(id.as_str()) {
                doc.reconcile_block(id.as_str())
                    .map_err(|e| TreeError::MalformedTree(e.to_string()))?;
            }
        }

        doc.version = 0;
        Ok(doc)
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of blocks in the tree, root included
    pub fn block_count(&self) -> usize {
        self.index.block_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_block(id)
    }

    pub fn find_block(&self, id: &str) -> Option<&Block> {
        let path = self.index.path(id)?;
        block_at(&self.root, &path)
    }

    /// Block owning the slot `id` is attached to
    pub fn parent_of(&self, id: &str) -> Option<&Block> {
        let parent = self.index.parent_of(id)?;
        self.find_block(parent.as_str())
    }

    /// Ids from the parent of `id` up to the root
    pub fn ancestors(&self, id: &str) -> Vec<&BlockId> {
        self.index.ancestors(id)
    }

    /// Distance from the root; the root itself is at depth 0
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.contains(id).then(|| self.index.ancestors(id).len())
    }

    /// Slots of the block `id` in order
    pub fn slots(&self, id: &str) -> Vec<SlotRef<'_>> {
        self.find_block(id)
            .map(|block| blocks::slots(block, &self.plan_of(block)))
            .unwrap_or_default()
    }

    /// Slot a block is attached to, `None` for the root
    pub fn slot_of(&self, id: &str) -> Option<(&Slot, usize)> {
        self.index.location(id).map(|loc| (&loc.slot, loc.index))
    }

    pub(crate) fn plan_of(&self, block: &Block) -> ContainerPlan {
        self.registry
            .container_plan(block, &self.options)
            .unwrap_or(ContainerPlan::Leaf)
    }

    pub(crate) fn slot_children(&self, slot: &Slot) -> Option<&Vec<Block>> {
        slot_children(&self.root, &self.index, slot)
    }

    /// Verify the tree against its index and the registry: unique ids,
    /// every block reachable from exactly one slot, index entries pointing
    /// at the right places, and containers matching each block's plan.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        check_shape(&self.registry, &self.options, &self.root, true)?;
        let rebuilt = LocationIndex::build(&self.root)
            .map_err(|id| TreeError::MalformedTree(format!("duplicate id {id}")))?;
        if rebuilt != self.index {
            return Err(TreeError::MalformedTree(
                "location index out of sync with the tree".to_string(),
            ));
        }
        Ok(())
    }

    /// Reconcile the containers of block `id` with its properties.
    pub fn reconcile(&mut self, id: &str) -> Result<Patch, EditError> {
        let mut patch = self.reconcile_block(id)?;
        patch.block = self.find_block(id).map(|b| b.id().clone());
        Ok(self.commit(patch))
    }

    /// Reconcile without bumping the version
    pub(crate) fn reconcile_block(&mut self, id: &str) -> Result<Patch, EditError> {
        let path = self
            .index
            .path(id)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?;
        let block = block_at_mut(&mut self.root, &path)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?;
        let plan = self.registry.container_plan(block, &self.options)?;

        let existing = std::mem::take(&mut block.containers);
        let Reconciled {
            containers: kept,
            removed,
            mut diff,
        } = containers::reconcile_containers(existing, &plan, self.options.shrink_policy);
        block.containers = kept;
        diff.block_id = Some(block.id.clone());

        let mut patch = Patch::default();
        if diff.is_empty() {
            return Ok(patch);
        }

        for container in &removed {
            self.index.remove_container(container);
        }
        self.index.renumber_containers(&block.id, &block.containers);
        if !diff.migrated.is_empty()
            && let Some(last) = block.containers.last()
        {
            let slot = Slot::Container(last.id.clone());
            self.index.renumber(&slot, &last.children);
            patch.changed.push(slot.id().to_string());
        }

        log::debug!(
            "Reconciled {} {}: +{} -{} containers",
            block.block_type,
            block.id,
            diff.added.len(),
            diff.removed.len()
        );
        if let Some(warning) = diff.warning() {
            log::warn!("{warning}");
            patch.warnings.push(warning);
        }
        patch.reconciled.push(diff);
        Ok(patch)
    }

    /// Stamp a successful edit with the next version
    pub(crate) fn commit(&mut self, mut patch: Patch) -> Patch {
        self.version += 1;
        patch.version = self.version;
        patch
    }
}

fn uses_containers(registry: &Registry, options: &EngineOptions, block: &Block) -> bool {
    registry
        .container_plan(block, options)
        .is_ok_and(|plan| plan.uses_containers())
}

/// Check every block's type and slot usage. `strict` also requires
/// containers to already match the plan.
pub(crate) fn check_shape(
    registry: &Registry,
    options: &EngineOptions,
    root: &Block,
    strict: bool,
) -> Result<(), TreeError> {
    let mut pending = vec![root];
    while let Some(block) = pending.pop() {
        let plan = registry
            .container_plan(block, options)
            .map_err(|RegistryError::UnknownBlockType(tag)| TreeError::UnknownBlockType(tag))?;
        let malformed = |reason: &str| {
            Err(TreeError::MalformedTree(format!(
                "{} {} {reason}",
                block.block_type(),
                block.id()
            )))
        };

        match &plan {
            ContainerPlan::Leaf if !block.children().is_empty() => {
                return malformed("cannot have children");
            }
            ContainerPlan::Leaf | ContainerPlan::Children if !block.containers().is_empty() => {
                return malformed("cannot have containers");
            }
            ContainerPlan::Indexed(_) | ContainerPlan::Named(_) if !block.children().is_empty() => {
                return malformed("keeps its children in containers");
            }
            ContainerPlan::Indexed(specs) | ContainerPlan::Named(specs) if strict => {
                let kinds_match = specs.len() == block.containers().len()
                    && specs
                        .iter()
                        .zip(block.containers())
                        .all(|(spec, container)| &spec.kind == container.kind());
                if !kinds_match {
                    return malformed("has containers out of step with its properties");
                }
            }
            _ => {}
        }

        pending.extend(block.child_blocks());
    }
    Ok(())
}

pub(crate) fn block_at<'a>(root: &'a Block, path: &[Step]) -> Option<&'a Block> {
    path.iter().try_fold(root, |block, step| match *step {
        Step::Child(index) => block.children.get(index),
        Step::Contained { position, index } => {
            block.containers.get(position)?.children.get(index)
        }
    })
}

pub(crate) fn block_at_mut<'a>(root: &'a mut Block, path: &[Step]) -> Option<&'a mut Block> {
    path.iter().try_fold(root, |block, step| match *step {
        Step::Child(index) => block.children.get_mut(index),
        Step::Contained { position, index } => {
            block.containers.get_mut(position)?.children.get_mut(index)
        }
    })
}

fn slot_children<'a>(root: &'a Block, index: &LocationIndex, slot: &Slot) -> Option<&'a Vec<Block>> {
    match slot {
        Slot::Children(owner) => {
            let path = index.path(owner.as_str())?;
            Some(&block_at(root, &path)?.children)
        }
        Slot::Container(id) => {
            let location = index.container(id.as_str())?;
            let path = index.path(location.owner.as_str())?;
            let owner = block_at(root, &path)?;
            Some(&owner.containers.get(location.position)?.children)
        }
    }
}

/// Mutable children of `slot`. Takes the root and index separately so
/// callers can keep updating the index while holding the slot.
pub(crate) fn slot_children_mut<'a>(
    root: &'a mut Block,
    index: &LocationIndex,
    slot: &Slot,
) -> Option<&'a mut Vec<Block>> {
    match slot {
        Slot::Children(owner) => {
            let path = index.path(owner.as_str())?;
            Some(&mut block_at_mut(root, &path)?.children)
        }
        Slot::Container(id) => {
            let location = index.container(id.as_str())?;
            let path = index.path(location.owner.as_str())?;
            let owner = block_at_mut(root, &path)?;
            Some(&mut owner.containers.get_mut(location.position)?.children)
        }
    }
}
