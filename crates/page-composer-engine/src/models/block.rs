use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Property bag of a block. Keys are unordered; `BTreeMap` keeps
/// serialization deterministic.
pub type Properties = BTreeMap<String, Value>;

/// Stable identifier of a block node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable identifier of a child container
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_id_impls {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id_impls!(BlockId);
string_id_impls!(ContainerId);

/// Tag naming a block type. The set of valid tags is whatever the
/// [`Registry`](crate::blocks::Registry) has descriptors for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(Cow<'static, str>);

impl BlockType {
    pub const PAGE: BlockType = BlockType::from_static("page");
    pub const CONTAINER: BlockType = BlockType::from_static("container");
    pub const SECTION: BlockType = BlockType::from_static("section");
    pub const FLEX: BlockType = BlockType::from_static("flex");
    pub const GRID: BlockType = BlockType::from_static("grid");
    pub const TABS: BlockType = BlockType::from_static("tabs");
    pub const CAROUSEL: BlockType = BlockType::from_static("carousel");
    pub const CARD: BlockType = BlockType::from_static("card");
    pub const HEADING: BlockType = BlockType::from_static("heading");
    pub const TEXT: BlockType = BlockType::from_static("text");
    pub const IMAGE: BlockType = BlockType::from_static("image");
    pub const BUTTON: BlockType = BlockType::from_static("button");
    pub const DIVIDER: BlockType = BlockType::from_static("divider");
    pub const SPACER: BlockType = BlockType::from_static("spacer");

    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BlockType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockType {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl From<String> for BlockType {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Semantic tag of a child container slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerKind(Cow<'static, str>);

impl ContainerKind {
    /// The implicit slot of simple container blocks, backed by `Block::children`
    pub const DEFAULT: ContainerKind = ContainerKind::from_static("default");
    pub const CELL: ContainerKind = ContainerKind::from_static("cell");
    pub const TAB: ContainerKind = ContainerKind::from_static("tab");
    pub const SLIDE: ContainerKind = ContainerKind::from_static("slide");
    pub const HEADER: ContainerKind = ContainerKind::from_static("header");
    pub const BODY: ContainerKind = ContainerKind::from_static("body");
    pub const FOOTER: ContainerKind = ContainerKind::from_static("footer");
    pub const IMAGE: ContainerKind = ContainerKind::from_static("image");

    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerKind {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

/// A node in the composition tree.
///
/// Simple container types (page, container, section, flex) hold their
/// content in `children`; cardinality-parameterized types (grid, tabs,
/// carousel, card) hold it in `containers`. Leaf types use neither.
///
/// Fields are crate-private: attached blocks are only mutated through
/// [`Document`](crate::editing::Document) so the location index stays valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) id: BlockId,
    #[serde(rename = "type")]
    pub(crate) block_type: BlockType,
    #[serde(default)]
    pub(crate) properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<Block>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) containers: Vec<ChildContainer>,
}

impl Block {
    /// Build a bare block with a fresh id and no content.
    pub(crate) fn new(block_type: BlockType, properties: Properties) -> Self {
        Self {
            id: BlockId::generate(),
            block_type,
            properties,
            children: Vec::new(),
            containers: Vec::new(),
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Look up a property, treating JSON `null` as unset
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).filter(|v| !v.is_null())
    }

    pub fn str_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }

    pub fn bool_property(&self, name: &str) -> Option<bool> {
        self.property(name).and_then(Value::as_bool)
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }

    pub fn containers(&self) -> &[ChildContainer] {
        &self.containers
    }

    /// Merge a partial property map. `null` values unset the key.
    pub(crate) fn merge_properties(&mut self, patch: Properties) {
        for (key, value) in patch {
            if value.is_null() {
                self.properties.remove(&key);
            } else {
                self.properties.insert(key, value);
            }
        }
    }

    /// Iterate over the direct child blocks, whichever slot they live in
    pub fn child_blocks(&self) -> impl Iterator<Item = &Block> {
        self.children
            .iter()
            .chain(self.containers.iter().flat_map(|c| c.children.iter()))
    }

    /// Number of blocks in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self.child_blocks().map(Block::subtree_len).sum::<usize>()
    }

    /// Depth-first walk over this block and all descendants
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Block)) {
        visit(self);
        for child in self.child_blocks() {
            child.walk(visit);
        }
    }

    /// Deep copy with every block and container id regenerated
    pub(crate) fn clone_with_fresh_ids(&self) -> Block {
        Block {
            id: BlockId::generate(),
            block_type: self.block_type.clone(),
            properties: self.properties.clone(),
            children: self
                .children
                .iter()
                .map(Block::clone_with_fresh_ids)
                .collect(),
            containers: self
                .containers
                .iter()
                .map(|c| ChildContainer {
                    id: ContainerId::generate(),
                    kind: c.kind.clone(),
                    title: c.title.clone(),
                    children: c.children.iter().map(Block::clone_with_fresh_ids).collect(),
                })
                .collect(),
        }
    }
}

/// A named, typed child slot owned by a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildContainer {
    pub(crate) id: ContainerId,
    #[serde(rename = "type")]
    pub(crate) kind: ContainerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<Block>,
}

impl ChildContainer {
    pub(crate) fn empty(kind: ContainerKind, title: Option<String>) -> Self {
        Self {
            id: ContainerId::generate(),
            kind,
            title,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    pub fn kind(&self) -> &ContainerKind {
        &self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// Blocks in this container's subtrees, containers themselves excluded
    pub fn subtree_len(&self) -> usize {
        self.children.iter().map(Block::subtree_len).sum()
    }
}
