use crate::blocks::RegistryError;
use crate::editing::document::block_at_mut;
use crate::editing::{Document, MoveError, MoveSource, Patch};
use crate::models::{BlockId, BlockType, Properties};

/// Edit commands understood by [`Document::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Create a block from the registry and insert it into `target`
    AddBlock {
        block_type: BlockType,
        target: String,
        index: Option<usize>,
        /// Merged over the type's defaults
        properties: Properties,
    },
    MoveBlock {
        id: BlockId,
        target: String,
        index: Option<usize>,
    },
    /// Merge `patch` into the block's properties; `null` unsets a key
    UpdateProperties { id: BlockId, patch: Properties },
    RemoveBlock { id: BlockId },
    DuplicateBlock { id: BlockId },
    Reconcile { id: BlockId },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),
    #[error("Operation not allowed on the root block")]
    RootBlock,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Document {
    /// Apply one command. On error the document is unchanged.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        match cmd {
            Cmd::AddBlock {
                block_type,
                target,
                index,
                properties,
            } => {
                let block = self.registry.create_with(
                    block_type.as_str(),
                    properties,
                    &self.options,
                )?;
                Ok(self.move_block(MoveSource::Detached(block), &target, index)?)
            }
            Cmd::MoveBlock { id, target, index } => {
                Ok(self.move_block(MoveSource::Existing(id), &target, index)?)
            }
            Cmd::UpdateProperties { id, patch } => self.update_properties(id.as_str(), patch),
            Cmd::RemoveBlock { id } => self.remove_with_patch(id.as_str()).map(|(_, patch)| patch),
            Cmd::DuplicateBlock { id } => self.duplicate_block(id.as_str()),
            Cmd::Reconcile { id } => self.reconcile(id.as_str()),
        }
    }

    /// Merge a partial property map into block `id`, then regenerate its
    /// containers if the new properties call for a different set.
    pub fn update_properties(&mut self, id: &str, patch: Properties) -> Result<Patch, EditError> {
        let path = self
            .index
            .path(id)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?;
        let block = block_at_mut(&mut self.root, &path)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?;
        let block_id = block.id().clone();
        block.merge_properties(patch);

        let mut result = self.reconcile_block(id)?;
        result.block = Some(block_id);
        Ok(self.commit(result))
    }
}
