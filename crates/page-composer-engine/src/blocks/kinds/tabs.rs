use serde_json::{Value, json};

use crate::blocks::containers::count_property;
use crate::blocks::{
    BlockDescriptor, Breakpoint, ContainerPlan, EditorField, EngineOptions, FieldKind,
    RenderContext, RenderOutput, properties,
};
use crate::models::{Block, BlockType, ContainerKind, Properties};

const DEFAULT_TABS: usize = 3;

/// Tabbed panels, one container per tab
pub struct Tabs;

impl Tabs {
    /// Title of tab `index`: `tabTitles[index]` when it is a non-empty
    /// string, `Tab N` otherwise
    pub fn tab_title(block: &Block, index: usize) -> String {
        block
            .property("tabTitles")
            .and_then(Value::as_array)
            .and_then(|titles| titles.get(index))
            .and_then(Value::as_str)
            .filter(|title| !title.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Tab {}", index + 1))
    }
}

impl BlockDescriptor for Tabs {
    fn block_type(&self) -> BlockType {
        BlockType::TABS
    }

    fn label(&self) -> &'static str {
        "Tabs"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("tabCount", json!(DEFAULT_TABS)),
            ("tabTitles", json!(["Tab 1", "Tab 2", "Tab 3"])),
            ("activeTab", json!(0)),
            ("orientation", json!("horizontal")),
        ])
    }

    fn container_plan(&self, block: &Block, options: &EngineOptions) -> ContainerPlan {
        let count = count_property(block, "tabCount", options.max_containers)
            .unwrap_or(DEFAULT_TABS.min(options.max_containers));
        ContainerPlan::indexed(count, ContainerKind::TAB, |i| Self::tab_title(block, i))
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("tabs")
            .attr(block, "activeTab")
            .responsive_attr(block, "orientation", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(
                block,
                "tabCount",
                "Tabs",
                FieldKind::Number {
                    min: Some(1),
                    max: None,
                },
            ),
            EditorField::plain(block, "tabTitles", "Tab titles", FieldKind::TextArea),
            EditorField::plain(
                block,
                "activeTab",
                "Initially open",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
            ),
            EditorField::responsive(
                block,
                "orientation",
                "Orientation",
                FieldKind::Select(vec!["horizontal", "vertical"]),
                breakpoint,
            ),
        ]
    }
}
