use serde_json::json;

use crate::blocks::{
    BlockDescriptor, Breakpoint, EditorField, FieldKind, RenderContext, RenderOutput, properties,
};
use crate::models::{Block, BlockType, Properties};

const DIRECTIONS: [&str; 2] = ["row", "column"];

/// Root of every page
pub struct Page;

impl BlockDescriptor for Page {
    fn block_type(&self) -> BlockType {
        BlockType::PAGE
    }

    fn label(&self) -> &'static str {
        "Page"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("title", json!("Untitled page")),
            ("background", json!("#ffffff")),
            ("padding", json!(0)),
        ])
    }

    fn can_have_children(&self) -> bool {
        true
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("page")
            .text(block.str_property("title"))
            .attr(block, "background")
            .responsive_attr(block, "padding", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(block, "title", "Title", FieldKind::Text),
            EditorField::plain(block, "background", "Background", FieldKind::Color),
            EditorField::responsive(
                block,
                "padding",
                "Padding",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
                breakpoint,
            ),
        ]
    }
}

/// Generic wrapper box
pub struct Container;

impl BlockDescriptor for Container {
    fn block_type(&self) -> BlockType {
        BlockType::CONTAINER
    }

    fn label(&self) -> &'static str {
        "Container"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("direction", json!("column")),
            ("padding", json!(16)),
            ("maxWidth", json!("1200px")),
        ])
    }

    fn can_have_children(&self) -> bool {
        true
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("div")
            .responsive_attr(block, "direction", ctx)
            .responsive_attr(block, "padding", ctx)
            .attr(block, "maxWidth")
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::responsive(
                block,
                "direction",
                "Direction",
                FieldKind::Select(DIRECTIONS.to_vec()),
                breakpoint,
            ),
            EditorField::responsive(
                block,
                "padding",
                "Padding",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
                breakpoint,
            ),
            EditorField::plain(block, "maxWidth", "Max width", FieldKind::Text),
        ]
    }
}

/// Full-width page band
pub struct Section;

impl BlockDescriptor for Section {
    fn block_type(&self) -> BlockType {
        BlockType::SECTION
    }

    fn label(&self) -> &'static str {
        "Section"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("paddingY", json!(48)),
            ("mobilePaddingY", json!(24)),
            ("fullWidth", json!(false)),
            ("background", json!("transparent")),
        ])
    }

    fn can_have_children(&self) -> bool {
        true
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("section")
            .responsive_attr(block, "paddingY", ctx)
            .attr(block, "fullWidth")
            .attr(block, "background")
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::responsive(
                block,
                "paddingY",
                "Vertical padding",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
                breakpoint,
            ),
            EditorField::plain(block, "fullWidth", "Full width", FieldKind::Toggle),
            EditorField::plain(block, "background", "Background", FieldKind::Color),
        ]
    }
}

/// Flexbox row/column
pub struct Flex;

impl BlockDescriptor for Flex {
    fn block_type(&self) -> BlockType {
        BlockType::FLEX
    }

    fn label(&self) -> &'static str {
        "Flex"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("direction", json!("row")),
            ("mobileDirection", json!("column")),
            ("gap", json!(8)),
            ("justify", json!("flex-start")),
            ("align", json!("stretch")),
            ("wrap", json!(false)),
        ])
    }

    fn can_have_children(&self) -> bool {
        true
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("flex")
            .responsive_attr(block, "direction", ctx)
            .responsive_attr(block, "gap", ctx)
            .responsive_attr(block, "justify", ctx)
            .responsive_attr(block, "align", ctx)
            .attr(block, "wrap")
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::responsive(
                block,
                "direction",
                "Direction",
                FieldKind::Select(DIRECTIONS.to_vec()),
                breakpoint,
            ),
            EditorField::responsive(
                block,
                "gap",
                "Gap",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
                breakpoint,
            ),
            EditorField::responsive(
                block,
                "justify",
                "Justify",
                FieldKind::Select(vec![
                    "flex-start",
                    "center",
                    "flex-end",
                    "space-between",
                    "space-around",
                ]),
                breakpoint,
            ),
            EditorField::responsive(
                block,
                "align",
                "Align",
                FieldKind::Select(vec!["stretch", "flex-start", "center", "flex-end"]),
                breakpoint,
            ),
            EditorField::plain(block, "wrap", "Wrap", FieldKind::Toggle),
        ]
    }
}
