/*!
 * # Editing Core Module
 *
 * The document controller and everything that reads or changes the block
 * tree through it.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Owner
 * - A [`Document`] owns the root `page` block; there is no other path to
 *   mutate an attached block
 * - Every edit is validated in full before the tree is touched, so failed
 *   edits leave no trace
 * - A version counter is bumped on each successful edit
 *
 * ### 2. Command-Based Editing
 * - Edits are expressed as **Commands** (`Cmd` enum) applied with
 *   `Document::apply`, or through the typed entry points they wrap
 * - Each edit returns a [`Patch`] naming the affected block and slots, any
 *   container reconciliation it caused and the warnings raised
 *
 * ### 3. Location Index
 * - Block id → (slot, position) and container id → (owner, position)
 * - Parent lookups, ancestor walks and cycle checks are O(depth)
 * - Kept in step on every splice; `check_invariants` rebuilds and compares
 *
 * ### 4. Read API
 * - `render` produces an immutable [`RenderTree`] for one breakpoint
 * - `property_editor` lists editor fields with cascade-resolved values
 * - [`format_outline`] gives a plain-text view for terminals and tests
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` type, queries, reconciliation of attached blocks
 * - **`index`**: location index and slot addressing
 * - **`moves`**: move/reparent engine, remove and duplicate
 * - **`commands`**: `Cmd` enum, `apply` and property updates
 * - **`session`**: selection, hit testing and drag state
 * - **`render`**: render dispatch, property editor and outline
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use std::sync::Arc;
 * use page_composer_engine::blocks::{Breakpoint, Registry};
 * use page_composer_engine::editing::*;
 * use page_composer_engine::models::Properties;
 *
 * let mut doc = Document::new(Arc::new(Registry::builtin())).unwrap();
 * let root = doc.root().id().to_string();
 *
 * // Drop a three-cell grid onto the page
 * let grid = doc
 *     .apply(Cmd::AddBlock {
 *         block_type: "grid".into(),
 *         target: root,
 *         index: None,
 *         properties: Properties::from([("cellCount".to_string(), 3.into())]),
 *     })
 *     .unwrap()
 *     .block
 *     .unwrap();
 *
 * // Put a heading into the first cell
 * let cell = doc.slots(grid.as_str())[0].id.to_string();
 * doc.move_block(MoveSource::New("heading".into()), &cell, None).unwrap();
 *
 * let tree = doc.render(&Session::new(), Breakpoint::Desktop);
 * assert_eq!(tree.root.slots[0].children[0].slots.len(), 3);
 * ```
 */

pub mod commands;
pub mod document;
pub mod index;
pub mod moves;
pub mod patch;
pub mod render;
pub mod session;

pub use commands::{Cmd, EditError};
pub use document::Document;
pub use index::{BlockLocation, ContainerLocation, Slot};
pub use moves::{MoveError, MoveSource};
pub use patch::Patch;
pub use render::{
    OutlineRow, RenderNode, RenderSlot, RenderTree, UNKNOWN_ELEMENT, format_outline, outline,
};
pub use session::{DragSource, DragState, Session, SessionEvent, hit_test};
