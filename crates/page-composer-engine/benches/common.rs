// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use std::sync::Arc;

use page_composer_engine::blocks::Registry;
use page_composer_engine::editing::{Document, MoveSource};
use page_composer_engine::{BlockId, Cmd, Properties};
use serde_json::json;

/// Ids of the blocks a generated page is built around
#[allow(dead_code)]
pub struct Landmarks {
    pub grids: Vec<BlockId>,
    pub headings: Vec<BlockId>,
}

/// A page of `sections` sections, each holding a four-cell grid with a
/// heading and a text block in every cell
#[allow(dead_code)]
pub fn generate_page(sections: usize) -> (Document, Landmarks) {
    let mut doc = Document::new(Arc::new(Registry::builtin())).unwrap();
    let root = doc.root().id().to_string();
    let mut landmarks = Landmarks {
        grids: Vec::new(),
        headings: Vec::new(),
    };

    for section in 0..sections {
        let section_id = add(&mut doc, "section", &root, Properties::new());
        let grid = add(
            &mut doc,
            "grid",
            section_id.as_str(),
            Properties::from([("cellCount".to_string(), json!(4))]),
        );
        let cells: Vec<String> = doc
            .slots(grid.as_str())
            .iter()
            .map(|slot| slot.id.to_string())
            .collect();
        for cell in &cells {
            let heading = add(
                &mut doc,
                "heading",
                cell,
                Properties::from([("text".to_string(), json!(format!("Section {section}")))]),
            );
            doc.move_block(MoveSource::New("text".into()), cell, None)
                .unwrap();
            landmarks.headings.push(heading);
        }
        landmarks.grids.push(grid);
    }

    (doc, landmarks)
}

fn add(doc: &mut Document, block_type: &str, target: &str, properties: Properties) -> BlockId {
    doc.apply(Cmd::AddBlock {
        block_type: block_type.into(),
        target: target.to_string(),
        index: None,
        properties,
    })
    .unwrap()
    .block
    .unwrap()
}
