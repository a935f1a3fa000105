use serde_json::{Value, json};

use crate::blocks::{
    BlockDescriptor, Breakpoint, EditorField, FieldKind, RenderContext, RenderOutput, properties,
};
use crate::models::{Block, BlockType, Properties};

const ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];

pub struct Heading;

impl Heading {
    /// Heading level clamped to 1..=6
    pub fn level(block: &Block) -> u8 {
        block
            .property("level")
            .and_then(Value::as_u64)
            .map(|level| level.clamp(1, 6) as u8)
            .unwrap_or(2)
    }
}

impl BlockDescriptor for Heading {
    fn block_type(&self) -> BlockType {
        BlockType::HEADING
    }

    fn label(&self) -> &'static str {
        "Heading"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("text", json!("Heading")),
            ("level", json!(2)),
            ("align", json!("left")),
        ])
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new(format!("h{}", Self::level(block)))
            .text(block.str_property("text"))
            .responsive_attr(block, "align", ctx)
            .responsive_attr(block, "fontSize", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(block, "text", "Text", FieldKind::Text),
            EditorField::plain(
                block,
                "level",
                "Level",
                FieldKind::Number {
                    min: Some(1),
                    max: Some(6),
                },
            ),
            EditorField::responsive(
                block,
                "align",
                "Alignment",
                FieldKind::Select(ALIGNMENTS.to_vec()),
                breakpoint,
            ),
            EditorField::responsive(
                block,
                "fontSize",
                "Font size",
                FieldKind::Number {
                    min: Some(8),
                    max: None,
                },
                breakpoint,
            ),
        ]
    }
}

pub struct Text;

impl BlockDescriptor for Text {
    fn block_type(&self) -> BlockType {
        BlockType::TEXT
    }

    fn label(&self) -> &'static str {
        "Text"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("text", json!("Write something...")),
            ("align", json!("left")),
            ("fontSize", json!(16)),
        ])
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("p")
            .text(block.str_property("text"))
            .responsive_attr(block, "align", ctx)
            .responsive_attr(block, "fontSize", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(block, "text", "Text", FieldKind::TextArea),
            EditorField::responsive(
                block,
                "align",
                "Alignment",
                FieldKind::Select(ALIGNMENTS.to_vec()),
                breakpoint,
            ),
            EditorField::responsive(
                block,
                "fontSize",
                "Font size",
                FieldKind::Number {
                    min: Some(8),
                    max: None,
                },
                breakpoint,
            ),
        ]
    }
}

pub struct Image;

impl BlockDescriptor for Image {
    fn block_type(&self) -> BlockType {
        BlockType::IMAGE
    }

    fn label(&self) -> &'static str {
        "Image"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("src", json!("")),
            ("alt", json!("")),
            ("fit", json!("cover")),
            ("width", json!("100%")),
        ])
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("img")
            .text(block.str_property("alt").filter(|alt| !alt.is_empty()))
            .attr(block, "src")
            .attr(block, "fit")
            .responsive_attr(block, "width", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(block, "src", "Source", FieldKind::Url),
            EditorField::plain(block, "alt", "Alt text", FieldKind::Text),
            EditorField::plain(
                block,
                "fit",
                "Fit",
                FieldKind::Select(vec!["cover", "contain", "fill", "none"]),
            ),
            EditorField::responsive(block, "width", "Width", FieldKind::Text, breakpoint),
        ]
    }
}

pub struct Button;

impl BlockDescriptor for Button {
    fn block_type(&self) -> BlockType {
        BlockType::BUTTON
    }

    fn label(&self) -> &'static str {
        "Button"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("label", json!("Click me")),
            ("href", json!("#")),
            ("variant", json!("primary")),
            ("fullWidth", json!(false)),
            ("mobileFullWidth", json!(true)),
        ])
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("button")
            .text(block.str_property("label"))
            .attr(block, "href")
            .attr(block, "variant")
            .responsive_attr(block, "fullWidth", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(block, "label", "Label", FieldKind::Text),
            EditorField::plain(block, "href", "Link", FieldKind::Url),
            EditorField::plain(
                block,
                "variant",
                "Style",
                FieldKind::Select(vec!["primary", "secondary", "outline", "link"]),
            ),
            EditorField::responsive(
                block,
                "fullWidth",
                "Full width",
                FieldKind::Toggle,
                breakpoint,
            ),
        ]
    }
}

pub struct Divider;

impl BlockDescriptor for Divider {
    fn block_type(&self) -> BlockType {
        BlockType::DIVIDER
    }

    fn label(&self) -> &'static str {
        "Divider"
    }

    fn default_properties(&self) -> Properties {
        properties([("thickness", json!(1)), ("color", json!("#e5e7eb"))])
    }

    fn render(&self, block: &Block, _ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("hr")
            .attr(block, "thickness")
            .attr(block, "color")
    }

    fn property_editor(&self, block: &Block, _breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(
                block,
                "thickness",
                "Thickness",
                FieldKind::Number {
                    min: Some(1),
                    max: Some(16),
                },
            ),
            EditorField::plain(block, "color", "Color", FieldKind::Color),
        ]
    }
}

pub struct Spacer;

impl BlockDescriptor for Spacer {
    fn block_type(&self) -> BlockType {
        BlockType::SPACER
    }

    fn label(&self) -> &'static str {
        "Spacer"
    }

    fn default_properties(&self) -> Properties {
        properties([("height", json!(32)), ("mobileHeight", json!(16))])
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("spacer").responsive_attr(block, "height", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![EditorField::responsive(
            block,
            "height",
            "Height",
            FieldKind::Number {
                min: Some(0),
                max: None,
            },
            breakpoint,
        )]
    }
}
