use serde_json::json;

use crate::blocks::containers::count_property;
use crate::blocks::{
    BlockDescriptor, Breakpoint, ContainerPlan, EditorField, EngineOptions, FieldKind,
    RenderContext, RenderOutput, properties,
};
use crate::models::{Block, BlockType, ContainerKind, Properties};

const DEFAULT_SLIDES: usize = 3;

/// Slideshow, one container per slide
pub struct Carousel;

impl BlockDescriptor for Carousel {
    fn block_type(&self) -> BlockType {
        BlockType::CAROUSEL
    }

    fn label(&self) -> &'static str {
        "Carousel"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("slideCount", json!(DEFAULT_SLIDES)),
            ("autoplay", json!(false)),
            ("interval", json!(5000)),
            ("showArrows", json!(true)),
            ("showDots", json!(true)),
            ("mobileShowArrows", json!(false)),
        ])
    }

    fn container_plan(&self, block: &Block, options: &EngineOptions) -> ContainerPlan {
        let count = count_property(block, "slideCount", options.max_containers)
            .unwrap_or(DEFAULT_SLIDES.min(options.max_containers));
        ContainerPlan::indexed(count, ContainerKind::SLIDE, |i| format!("Slide {}", i + 1))
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("carousel")
            .attr(block, "autoplay")
            .attr(block, "interval")
            .responsive_attr(block, "showArrows", ctx)
            .responsive_attr(block, "showDots", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(
                block,
                "slideCount",
                "Slides",
                FieldKind::Number {
                    min: Some(1),
                    max: None,
                },
            ),
            EditorField::plain(block, "autoplay", "Autoplay", FieldKind::Toggle),
            EditorField::plain(
                block,
                "interval",
                "Interval (ms)",
                FieldKind::Number {
                    min: Some(500),
                    max: None,
                },
            ),
            EditorField::responsive(
                block,
                "showArrows",
                "Arrows",
                FieldKind::Toggle,
                breakpoint,
            ),
            EditorField::responsive(block, "showDots", "Dots", FieldKind::Toggle, breakpoint),
        ]
    }
}
