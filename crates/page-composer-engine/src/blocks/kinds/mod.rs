//! Built-in block descriptors.
//!
//! - **`layout`**: simple container blocks holding children directly
//! - **`grid`**, **`tabs`**, **`carousel`**, **`card`**: cardinality-parameterized blocks
//! - **`content`**: leaf blocks

pub mod card;
pub mod carousel;
pub mod content;
pub mod grid;
pub mod layout;
pub mod tabs;

use crate::blocks::Registry;

pub use card::Card;
pub use carousel::Carousel;
pub use content::{Button, Divider, Heading, Image, Spacer, Text};
pub use grid::Grid;
pub use layout::{Container, Flex, Page, Section};
pub use tabs::Tabs;

pub(crate) fn register_builtin(registry: &mut Registry) {
    registry.register(Page);
    registry.register(Container);
    registry.register(Section);
    registry.register(Flex);
    registry.register(Grid);
    registry.register(Tabs);
    registry.register(Carousel);
    registry.register(Card);
    registry.register(Heading);
    registry.register(Text);
    registry.register(Image);
    registry.register(Button);
    registry.register(Divider);
    registry.register(Spacer);
}
