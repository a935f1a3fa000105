pub mod block;

pub use block::{Block, BlockId, BlockType, ChildContainer, ContainerId, ContainerKind, Properties};
