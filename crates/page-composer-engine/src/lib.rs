pub mod blocks;
pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{BlockDescriptor, Breakpoint, EngineOptions, Registry, ShrinkPolicy, Warning};
pub use editing::{Cmd, Document, EditError, MoveError, MoveSource, Patch, Session};
pub use io::{IoError, TreeError, read_page, write_page};
pub use models::{Block, BlockId, BlockType, ChildContainer, ContainerId, ContainerKind, Properties};
