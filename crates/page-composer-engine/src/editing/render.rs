//! Render/selection dispatch over the tree.
//!
//! [`Document::render`] walks the tree once, asking each block's descriptor
//! for its own view and recursing into its slots with a [`RenderContext`]
//! that says where the block sits. Descriptors never see their children.

use crate::blocks::{Breakpoint, EditorField, RenderContext, RenderOutput};
use crate::editing::{Document, EditError, Session};
use crate::models::{Block, BlockId, BlockType, ContainerKind, Properties};

/// Element name of blocks whose type the registry does not know
pub const UNKNOWN_ELEMENT: &str = "unknown";

/// Immutable view of a document for one breakpoint
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    pub version: u64,
    pub breakpoint: Breakpoint,
    pub root: RenderNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub block_id: BlockId,
    pub block_type: BlockType,
    pub element: String,
    pub text: Option<String>,
    pub attributes: Properties,
    pub selected: bool,
    pub parent_id: Option<BlockId>,
    pub container_id: Option<String>,
    pub container_type: Option<ContainerKind>,
    pub depth: usize,
    pub slots: Vec<RenderSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSlot {
    pub id: String,
    pub kind: ContainerKind,
    pub title: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderTree {
    /// Depth-first search for a node
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        self.root.find(id)
    }
}

impl RenderNode {
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        if self.block_id.as_str() == id {
            return Some(self);
        }
        self.slots
            .iter()
            .flat_map(|slot| slot.children.iter())
            .find_map(|child| child.find(id))
    }
}

impl Document {
    pub fn render(&self, session: &Session, breakpoint: Breakpoint) -> RenderTree {
        let ctx = RenderContext::root(session.selected().cloned(), breakpoint);
        RenderTree {
            version: self.version,
            breakpoint,
            root: self.render_node(&self.root, &ctx),
        }
    }

    fn render_node(&self, block: &Block, ctx: &RenderContext) -> RenderNode {
        let (output, slots) = match self.registry.lookup(block.block_type().as_str()) {
            Ok(descriptor) => (
                descriptor.render(block, ctx),
                crate::blocks::slots(block, &descriptor.container_plan(block, &self.options)),
            ),
            Err(_) => (
                RenderOutput::new(UNKNOWN_ELEMENT).text(Some(block.block_type().as_str())),
                Vec::new(),
            ),
        };

        RenderNode {
            block_id: block.id().clone(),
            block_type: block.block_type().clone(),
            element: output.element,
            text: output.text,
            attributes: output.attributes,
            selected: ctx.is_selected(block.id()),
            parent_id: ctx.parent_id.clone(),
            container_id: ctx.container_id.clone(),
            container_type: ctx.container_type.clone(),
            depth: ctx.depth,
            slots: slots
                .into_iter()
                .map(|slot| {
                    let child_ctx = ctx.child(block.id(), slot.id, slot.kind);
                    RenderSlot {
                        id: slot.id.to_string(),
                        kind: slot.kind.clone(),
                        title: slot.title.map(str::to_string),
                        children: slot
                            .children
                            .iter()
                            .map(|child| self.render_node(child, &child_ctx))
                            .collect(),
                    }
                })
                .collect(),
        }
    }

    /// Property panel fields for block `id`, with values resolved for
    /// `breakpoint`
    pub fn property_editor(
        &self,
        id: &str,
        breakpoint: Breakpoint,
    ) -> Result<Vec<EditorField>, EditError> {
        let block = self
            .find_block(id)
            .ok_or_else(|| EditError::BlockNotFound(id.to_string()))?;
        let descriptor = self.registry.lookup(block.block_type().as_str())?;
        Ok(descriptor.property_editor(block, breakpoint))
    }
}

/// One line of the plain-text outline
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineRow {
    Block {
        depth: usize,
        id: BlockId,
        block_type: BlockType,
        text: Option<String>,
    },
    /// A real child container; default slots are not listed
    Slot {
        depth: usize,
        id: String,
        kind: ContainerKind,
        title: Option<String>,
    },
}

impl OutlineRow {
    pub fn depth(&self) -> usize {
        match self {
            OutlineRow::Block { depth, .. } | OutlineRow::Slot { depth, .. } => *depth,
        }
    }

    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            OutlineRow::Block { id, .. } => Some(id),
            OutlineRow::Slot { .. } => None,
        }
    }
}

impl std::fmt::Display for OutlineRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:indent$}", "", indent = self.depth() * 2)?;
        match self {
            OutlineRow::Block {
                block_type, text, ..
            } => {
                write!(f, "{block_type}")?;
                if let Some(text) = text {
                    write!(f, " {text:?}")?;
                }
            }
            OutlineRow::Slot { kind, title, .. } => {
                write!(f, "[{kind}]")?;
                if let Some(title) = title {
                    write!(f, " {title}")?;
                }
            }
        }
        Ok(())
    }
}

/// Flatten the tree into outline rows, depth first
pub fn outline(doc: &Document) -> Vec<OutlineRow> {
    let mut rows = Vec::with_capacity(doc.block_count());
    push_rows(doc, doc.root(), 0, &mut rows);
    rows
}

fn push_rows(doc: &Document, block: &Block, depth: usize, rows: &mut Vec<OutlineRow>) {
    let text = doc
        .registry()
        .lookup(block.block_type().as_str())
        .ok()
        .and_then(|descriptor| {
            descriptor
                .render(block, &RenderContext::root(None, Breakpoint::Desktop))
                .text
        });
    rows.push(OutlineRow::Block {
        depth,
        id: block.id().clone(),
        block_type: block.block_type().clone(),
        text,
    });

    if block.containers().is_empty() {
        for child in block.children() {
            push_rows(doc, child, depth + 1, rows);
        }
        return;
    }
    for container in block.containers() {
        rows.push(OutlineRow::Slot {
            depth: depth + 1,
            id: container.id().to_string(),
            kind: container.kind().clone(),
            title: container.title().map(str::to_string),
        });
        for child in container.children() {
            push_rows(doc, child, depth + 2, rows);
        }
    }
}

/// Plain-text outline of the whole tree, one row per line
pub fn format_outline(doc: &Document) -> String {
    outline(doc).iter().map(|row| format!("{row}\n")).collect()
}
