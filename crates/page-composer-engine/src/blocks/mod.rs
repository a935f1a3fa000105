//! # Block Descriptors
//!
//! Every block type is described by one [`BlockDescriptor`] implementation,
//! collected into a [`Registry`] that is built once at startup. Adding a new
//! block type means registering a descriptor; the tree engine itself never
//! changes.
//!
//! ## Module Structure
//!
//! - **`registry`**: tag → descriptor map, block instantiation
//! - **`containers`**: container plans and reconciliation of child containers
//! - **`responsive`**: breakpoint fallback cascade for layout properties
//! - **`kinds`**: built-in descriptors (layout, cardinality and content blocks)

pub mod containers;
pub mod kinds;
pub mod registry;
pub mod responsive;

use serde_json::Value;

use crate::models::{Block, BlockId, BlockType, ContainerKind, Properties};

pub use containers::{
    ContainerPlan, EngineOptions, ReconcileDiff, ShrinkPolicy, SlotSpec, Warning,
};
pub use registry::{Registry, RegistryError};
pub use responsive::{Breakpoint, Resolved, Source};

/// Behavior of one block type
pub trait BlockDescriptor: Send + Sync {
    /// Tag this descriptor is registered under
    fn block_type(&self) -> BlockType;

    /// Human readable name for palettes and outlines
    fn label(&self) -> &'static str;

    /// A freshly built default property map. Each call returns a new map so
    /// no two blocks ever share their defaults.
    fn default_properties(&self) -> Properties;

    /// Whether the block holds children directly in a single default slot
    fn can_have_children(&self) -> bool {
        false
    }

    /// Slots this block should have given its current properties
    fn container_plan(&self, _block: &Block, _options: &EngineOptions) -> ContainerPlan {
        if self.can_have_children() {
            ContainerPlan::Children
        } else {
            ContainerPlan::Leaf
        }
    }

    /// Produce the block's own view. Child slots are filled in by the
    /// dispatcher.
    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput;

    /// Fields shown by the property panel for this block
    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField>;
}

/// Where a block sits and how the editing session sees it while rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Currently selected block in the session, if any
    pub selected: Option<BlockId>,
    /// Block owning the slot this block lives in
    pub parent_id: Option<BlockId>,
    /// Slot id drops next to this block should target
    pub container_id: Option<String>,
    pub container_type: Option<ContainerKind>,
    pub breakpoint: Breakpoint,
    pub depth: usize,
}

impl RenderContext {
    pub fn root(selected: Option<BlockId>, breakpoint: Breakpoint) -> Self {
        Self {
            selected,
            parent_id: None,
            container_id: None,
            container_type: None,
            breakpoint,
            depth: 0,
        }
    }

    /// Context for a child rendered inside `slot` of `parent`
    pub fn child(&self, parent: &BlockId, slot_id: &str, slot_kind: &ContainerKind) -> Self {
        Self {
            selected: self.selected.clone(),
            parent_id: Some(parent.clone()),
            container_id: Some(slot_id.to_string()),
            container_type: Some(slot_kind.clone()),
            breakpoint: self.breakpoint,
            depth: self.depth + 1,
        }
    }

    pub fn is_selected(&self, id: &BlockId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}

/// A descriptor's view of one block
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Element name, e.g. `h2`, `img`, `grid`
    pub element: String,
    /// Visible text content, if the block has any
    pub text: Option<String>,
    /// Effective attributes for the context's breakpoint
    pub attributes: Properties,
}

impl RenderOutput {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            text: None,
            attributes: Properties::new(),
        }
    }

    pub fn text(mut self, text: Option<&str>) -> Self {
        self.text = text.map(str::to_string);
        self
    }

    /// Copy a plain property through when it is set
    pub fn attr(mut self, block: &Block, name: &str) -> Self {
        if let Some(value) = block.property(name) {
            self.attributes.insert(name.to_string(), value.clone());
        }
        self
    }

    /// Resolve a responsive property for the context's breakpoint
    pub fn responsive_attr(mut self, block: &Block, name: &str, ctx: &RenderContext) -> Self {
        if let Some(value) =
            responsive::resolve_value(block.properties(), name, ctx.breakpoint, None)
        {
            self.attributes.insert(name.to_string(), value.clone());
        }
        self
    }
}

/// Input widget a property field is edited with
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number { min: Option<i64>, max: Option<i64> },
    Toggle,
    Select(Vec<&'static str>),
    Color,
    Url,
}

/// One row of the property panel
#[derive(Debug, Clone, PartialEq)]
pub struct EditorField {
    /// Key an edit of this field writes to
    pub key: String,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Current effective value
    pub value: Option<Value>,
    /// Value comes from another breakpoint or a default; shown as
    /// "(inherited)"
    pub inherited: bool,
    pub responsive: bool,
}

impl EditorField {
    /// A field bound directly to one property key
    pub fn plain(block: &Block, key: &str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label,
            kind,
            value: block.property(key).cloned(),
            inherited: false,
            responsive: false,
        }
    }

    /// A field for a responsive property at `breakpoint`, resolved through
    /// the cascade
    pub fn responsive(
        block: &Block,
        base: &str,
        label: &'static str,
        kind: FieldKind,
        breakpoint: Breakpoint,
    ) -> Self {
        let resolved = responsive::resolve(block.properties(), base, breakpoint, None);
        Self {
            key: breakpoint.edit_key(base),
            label,
            kind,
            inherited: resolved
                .as_ref()
                .is_some_and(|r| r.is_inherited(breakpoint)),
            value: resolved.map(|r| r.value.clone()),
            responsive: true,
        }
    }
}

/// A slot of a block as seen by readers: either a real container or the
/// implicit default slot of a simple container block
#[derive(Debug, Clone, Copy)]
pub struct SlotRef<'a> {
    pub id: &'a str,
    pub kind: &'a ContainerKind,
    pub title: Option<&'a str>,
    pub children: &'a [Block],
}

static DEFAULT_SLOT_KIND: ContainerKind = ContainerKind::DEFAULT;

/// Slots of `block` in order. Simple container blocks expose one default
/// slot keyed by their own id.
pub fn slots<'a>(block: &'a Block, plan: &ContainerPlan) -> Vec<SlotRef<'a>> {
    match plan {
        ContainerPlan::Leaf => Vec::new(),
        ContainerPlan::Children => vec![SlotRef {
            id: block.id().as_str(),
            kind: &DEFAULT_SLOT_KIND,
            title: None,
            children: block.children(),
        }],
        ContainerPlan::Indexed(_) | ContainerPlan::Named(_) => block
            .containers()
            .iter()
            .map(|c| SlotRef {
                id: c.id().as_str(),
                kind: c.kind(),
                title: c.title(),
                children: c.children(),
            })
            .collect(),
    }
}

/// Build a property map from literal pairs
pub(crate) fn properties<const N: usize>(pairs: [(&str, Value); N]) -> Properties {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
