use crate::blocks::{ReconcileDiff, Warning};
use crate::models::BlockId;

/// Result of applying an edit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    /// Block the edit was about; for inserts and duplicates, the new block
    pub block: Option<BlockId>,
    /// Ids of slots whose children changed
    pub changed: Vec<String>,
    /// Container reconciliations the edit triggered
    pub reconciled: Vec<ReconcileDiff>,
    pub warnings: Vec<Warning>,
    pub version: u64,
}
