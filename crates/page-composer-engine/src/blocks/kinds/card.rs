use serde_json::json;

use crate::blocks::{
    BlockDescriptor, Breakpoint, ContainerPlan, EditorField, EngineOptions, FieldKind,
    RenderContext, RenderOutput, SlotSpec, properties,
};
use crate::models::{Block, BlockType, ContainerKind, Properties};

/// Card with optional image, header and footer sections around a body
pub struct Card;

impl BlockDescriptor for Card {
    fn block_type(&self) -> BlockType {
        BlockType::CARD
    }

    fn label(&self) -> &'static str {
        "Card"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("showImage", json!(true)),
            ("showHeader", json!(true)),
            ("showFooter", json!(false)),
            ("elevation", json!(1)),
            ("radius", json!(8)),
        ])
    }

    fn container_plan(&self, block: &Block, _options: &EngineOptions) -> ContainerPlan {
        let mut sections = Vec::with_capacity(4);
        if block.bool_property("showImage").unwrap_or(false) {
            sections.push(SlotSpec::new(ContainerKind::IMAGE, "Image"));
        }
        if block.bool_property("showHeader").unwrap_or(false) {
            sections.push(SlotSpec::new(ContainerKind::HEADER, "Header"));
        }
        sections.push(SlotSpec::new(ContainerKind::BODY, "Body"));
        if block.bool_property("showFooter").unwrap_or(false) {
            sections.push(SlotSpec::new(ContainerKind::FOOTER, "Footer"));
        }
        ContainerPlan::Named(sections)
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("card")
            .attr(block, "elevation")
            .responsive_attr(block, "radius", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(block, "showImage", "Image", FieldKind::Toggle),
            EditorField::plain(block, "showHeader", "Header", FieldKind::Toggle),
            EditorField::plain(block, "showFooter", "Footer", FieldKind::Toggle),
            EditorField::plain(
                block,
                "elevation",
                "Elevation",
                FieldKind::Number {
                    min: Some(0),
                    max: Some(5),
                },
            ),
            EditorField::responsive(
                block,
                "radius",
                "Corner radius",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
                breakpoint,
            ),
        ]
    }
}
