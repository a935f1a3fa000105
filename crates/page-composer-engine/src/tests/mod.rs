//! Shared fixtures for unit tests

use std::sync::Arc;

use serde_json::{Value, json};

use crate::blocks::Registry;
use crate::editing::{Cmd, Document, MoveSource};
use crate::models::{BlockId, BlockType, Properties};

pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::builtin())
}

/// Ids of the blocks built by [`grid_page`]
pub struct GridPage {
    pub grid: BlockId,
    pub heading: BlockId,
}

/// `page > grid(cells) > first cell > heading`, built through the public
/// editing API
pub fn grid_page(cells: usize) -> (Document, GridPage) {
    let mut doc = Document::new(registry()).unwrap();
    let root = doc.root().id().to_string();

    let grid = doc
        .apply(Cmd::AddBlock {
            block_type: BlockType::GRID,
            target: root,
            index: None,
            properties: Properties::from([("cellCount".to_string(), json!(cells))]),
        })
        .unwrap()
        .block
        .unwrap();
    let first_cell = doc.slots(grid.as_str())[0].id.to_string();
    let heading = doc
        .move_block(MoveSource::New(BlockType::HEADING), &first_cell, None)
        .unwrap()
        .block
        .unwrap();

    (doc, GridPage { grid, heading })
}

/// The persisted form of the whole tree
pub fn root_json(doc: &Document) -> Value {
    serde_json::to_value(doc.root()).unwrap()
}
