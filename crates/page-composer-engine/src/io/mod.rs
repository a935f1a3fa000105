use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::blocks::{EngineOptions, Registry};
use crate::editing::Document;
use crate::models::Block;

/// Problems with a persisted tree
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
    #[error("Malformed tree: {0}")]
    MalformedTree(String),
    #[error("Invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        // Well-formed JSON of the wrong shape is a tree problem, not a
        // syntax problem
        match err.classify() {
            serde_json::error::Category::Data => TreeError::MalformedTree(err.to_string()),
            _ => TreeError::Json(err),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid page file {path}: {source}")]
    Tree {
        path: PathBuf,
        #[source]
        source: TreeError,
    },
}

impl Document {
    /// Load a persisted tree. Unknown types and misplaced slots are
    /// rejected; cardinality blocks are reconciled with their properties.
    pub fn from_json(
        json: &str,
        registry: Arc<Registry>,
        options: EngineOptions,
    ) -> Result<Self, TreeError> {
        let root: Block = serde_json::from_str(json)?;
        Self::from_root(root, registry, options)
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        serde_json::to_string_pretty(&self.root).map_err(TreeError::Json)
    }
}

/// Read a page file into a document
pub fn read_page(
    path: &Path,
    registry: Arc<Registry>,
    options: EngineOptions,
) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    let doc = Document::from_json(&json, registry, options).map_err(|source| IoError::Tree {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} blocks from {}", doc.block_count(), path.display());
    Ok(doc)
}

/// Write a document to a page file
pub fn write_page(path: &Path, doc: &Document) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = doc.to_json().map_err(|source| IoError::Tree {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json + "\n")?;
    Ok(())
}
