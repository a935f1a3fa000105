use serde_json::json;

use crate::blocks::containers::count_property;
use crate::blocks::{
    BlockDescriptor, Breakpoint, ContainerPlan, EditorField, EngineOptions, FieldKind,
    RenderContext, RenderOutput, properties,
};
use crate::models::{Block, BlockType, ContainerKind, Properties};

const DEFAULT_CELLS: usize = 2;

/// Grid of cells, one container per cell
pub struct Grid;

impl Grid {
    /// Cells wanted by the grid: `cellCount` when set, otherwise the widest
    /// column count requested at any breakpoint.
    pub fn cell_count(block: &Block, options: &EngineOptions) -> usize {
        let max = options.max_containers;
        count_property(block, "cellCount", max).unwrap_or_else(|| {
            Breakpoint::ALL
                .iter()
                .map(|bp| bp.edit_key("columns"))
                .filter_map(|key| count_property(block, &key, max))
                .max()
                .unwrap_or(DEFAULT_CELLS.min(max))
        })
    }
}

impl BlockDescriptor for Grid {
    fn block_type(&self) -> BlockType {
        BlockType::GRID
    }

    fn label(&self) -> &'static str {
        "Grid"
    }

    fn default_properties(&self) -> Properties {
        properties([
            ("cellCount", json!(DEFAULT_CELLS)),
            ("columns", json!(2)),
            ("tabletColumns", json!(2)),
            ("mobileColumns", json!(1)),
            ("gap", json!(16)),
        ])
    }

    fn container_plan(&self, block: &Block, options: &EngineOptions) -> ContainerPlan {
        ContainerPlan::indexed(Self::cell_count(block, options), ContainerKind::CELL, |i| {
            format!("Cell {}", i + 1)
        })
    }

    fn render(&self, block: &Block, ctx: &RenderContext) -> RenderOutput {
        RenderOutput::new("grid")
            .responsive_attr(block, "columns", ctx)
            .responsive_attr(block, "gap", ctx)
    }

    fn property_editor(&self, block: &Block, breakpoint: Breakpoint) -> Vec<EditorField> {
        vec![
            EditorField::plain(
                block,
                "cellCount",
                "Cells",
                FieldKind::Number {
                    min: Some(0),
                    max: None,
                },
            ),
            EditorField::responsive(
                block,
                "columns",
                "Columns",
                FieldKind::Number {
                    min: Some(1),
                    max: Some(12),
                },
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
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Registry;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn grid_with(props: &[(&str, Value)]) -> Block {
        let mut block = Registry::builtin().create("grid").unwrap();
        block.properties.clear();
        block.merge_properties(
            props
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        );
        block
    }

    #[test]
    fn test_cell_count_prefers_explicit_count() {
        let block = grid_with(&[("cellCount", json!(5)), ("columns", json!(3))]);
        assert_eq!(Grid::cell_count(&block, &EngineOptions::default()), 5);
    }

    #[test]
    fn test_cell_count_falls_back_to_widest_breakpoint() {
        let block = grid_with(&[
            ("columns", json!(2)),
            ("tabletColumns", json!(4)),
            ("mobileColumns", json!(1)),
        ]);
        assert_eq!(Grid::cell_count(&block, &EngineOptions::default()), 4);
    }

    #[test]
    fn test_cell_count_respects_max_containers() {
        let block = grid_with(&[("cellCount", json!(40))]);
        let options = EngineOptions {
            max_containers: 8,
            ..EngineOptions::default()
        };
        assert_eq!(Grid::cell_count(&block, &options), 8);
    }

    #[test]
    fn test_plan_titles_cells() {
        let block = grid_with(&[("cellCount", json!(2))]);
        let ContainerPlan::Indexed(specs) = Grid.container_plan(&block, &EngineOptions::default())
        else {
            panic!("grid should plan indexed containers");
        };
        let titles: Vec<_> = specs.iter().map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("Cell 1"), Some("Cell 2")]);
    }

    #[test]
    fn test_render_resolves_columns_per_breakpoint() {
        let block = grid_with(&[("columns", json!(3)), ("mobileColumns", json!(1))]);

        let tablet = Grid.render(&block, &RenderContext::root(None, Breakpoint::Tablet));
        let mobile = Grid.render(&block, &RenderContext::root(None, Breakpoint::Mobile));

        assert_eq!(tablet.attributes.get("columns"), Some(&json!(3)));
        assert_eq!(mobile.attributes.get("columns"), Some(&json!(1)));
    }
}
