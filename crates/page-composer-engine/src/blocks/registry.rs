use std::collections::HashMap;

use crate::blocks::containers::{self, ContainerPlan, EngineOptions, ReconcileDiff};
use crate::blocks::{BlockDescriptor, kinds};
use crate::models::{Block, BlockType, Properties};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
}

/// Tag → descriptor map. Built once at startup and shared read-only.
#[derive(Default)]
pub struct Registry {
    descriptors: HashMap<BlockType, Box<dyn BlockDescriptor>>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in block type
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        kinds::register_builtin(&mut registry);
        registry
    }

    /// Register a descriptor, replacing any previous one for the same tag
    pub fn register(&mut self, descriptor: impl BlockDescriptor + 'static) {
        let tag = descriptor.block_type();
        if self
            .descriptors
            .insert(tag.clone(), Box::new(descriptor))
            .is_some()
        {
            log::debug!("Replaced descriptor for block type {tag}");
        }
    }

    pub fn lookup(&self, block_type: &str) -> Result<&dyn BlockDescriptor, RegistryError> {
        self.descriptors
            .get(block_type)
            .map(Box::as_ref)
            .ok_or_else(|| RegistryError::UnknownBlockType(block_type.to_string()))
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.descriptors.contains_key(block_type)
    }

    /// Registered tags, sorted
    pub fn types(&self) -> Vec<&BlockType> {
        let mut types: Vec<_> = self.descriptors.keys().collect();
        types.sort();
        types
    }

    /// An independent copy of the defaults for `block_type`
    pub fn default_properties(&self, block_type: &str) -> Result<Properties, RegistryError> {
        Ok(self.lookup(block_type)?.default_properties())
    }

    /// Instantiate an unattached block with default properties
    pub fn create(&self, block_type: &str) -> Result<Block, RegistryError> {
        self.create_with(block_type, Properties::new(), &EngineOptions::default())
    }

    /// Instantiate an unattached block with `overrides` merged over the
    /// defaults. Cardinality blocks come with their containers in place.
    pub fn create_with(
        &self,
        block_type: &str,
        overrides: Properties,
        options: &EngineOptions,
    ) -> Result<Block, RegistryError> {
        let descriptor = self.lookup(block_type)?;
        let mut block = Block::new(descriptor.block_type(), descriptor.default_properties());
        block.merge_properties(overrides);

        let plan = descriptor.container_plan(&block, options);
        if plan.uses_containers() {
            let reconciled = containers::reconcile_containers(Vec::new(), &plan, options.shrink_policy);
            block.containers = reconciled.containers;
        }

        Ok(block)
    }

    /// Desired slot layout for `block` given its current properties
    pub fn container_plan(
        &self,
        block: &Block,
        options: &EngineOptions,
    ) -> Result<ContainerPlan, RegistryError> {
        Ok(self
            .lookup(block.block_type().as_str())?
            .container_plan(block, options))
    }

    /// Bring the containers of `block` in line with its properties.
    ///
    /// Idempotent. Used for detached blocks; attached blocks go through
    /// [`Document::reconcile`](crate::editing::Document::reconcile) so the
    /// location index follows.
    pub fn resolve_containers(
        &self,
        block: &mut Block,
        options: &EngineOptions,
    ) -> Result<ReconcileDiff, RegistryError> {
        let plan = self.container_plan(block, options)?;
        if !plan.uses_containers() && block.containers.is_empty() {
            return Ok(ReconcileDiff {
                block_id: Some(block.id.clone()),
                ..ReconcileDiff::default()
            });
        }

        let existing = std::mem::take(&mut block.containers);
        let reconciled = containers::reconcile_containers(existing, &plan, options.shrink_policy);
        block.containers = reconciled.containers;

        let mut diff = reconciled.diff;
        diff.block_id = Some(block.id.clone());
        Ok(diff)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types())
            .finish()
    }
}
