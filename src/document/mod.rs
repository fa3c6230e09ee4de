//! Rendered chapter structure: chapter -> lines -> tappable units.

mod render;
mod unit;

pub use render::render;
pub use unit::{CharacterUnit, RenderedChapter, RenderedLine, UnitId, YieldMark, YieldStrength};
