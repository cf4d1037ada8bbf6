//! Rendering module
//!
//! The game draws through the [`Canvas`] trait. [`Scene`] is the in-memory
//! entity arena every canvas is built on; [`GameView`] mirrors a
//! [`GameState`](crate::sim::GameState) into canvas entities and
//! [`raster`] turns a scene into a character grid for the terminal.

pub mod raster;
pub mod scene;
pub mod view;

pub use scene::Scene;
pub use view::GameView;

use generational_arena::Index;
use glam::Vec2;

/// RGB color
pub type Color = [u8; 3];

/// Colors for game elements
pub mod colors {
    use super::Color;
    use crate::sim::BlockColor;

    pub const BACKGROUND: Color = [0, 128, 0];
    pub const PLANE: Color = [255, 192, 203];
    pub const PLANE_CRASHED: Color = [255, 0, 0];
    pub const BOMB: Color = [255, 0, 0];
    pub const SCORE_TEXT: Color = [220, 20, 60];

    pub fn block(color: BlockColor) -> Color {
        match color {
            BlockColor::Black => [0, 0, 0],
            BlockColor::DarkGreen => [0, 100, 0],
            BlockColor::Brown => [165, 42, 42],
        }
    }
}

/// Handle to an entity owned by a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub(crate) index: Index,
}

/// Entity outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    /// Pointing right
    Triangle,
}

/// A drawable entity, in world units centered on the window
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub shape: Shape,
    pub color: Color,
    /// Full width/height
    pub size: Vec2,
    pub pos: Vec2,
    pub visible: bool,
}

/// Text alignment relative to the label position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: &'static str,
    pub size: u16,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Courier",
            size: 24,
        }
    }
}

/// A line of text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub font: Font,
    pub align: Align,
    pub color: Color,
}

/// Drawing surface the game renders into.
///
/// Entities live until [`Canvas::clear_all`]. Changes may be buffered until
/// [`Canvas::flush`].
pub trait Canvas {
    fn create_entity(&mut self, visual: Visual) -> EntityId;
    fn move_entity(&mut self, id: EntityId, pos: Vec2);
    fn recolor(&mut self, id: EntityId, color: Color);
    fn set_visible(&mut self, id: EntityId, visible: bool);
    fn draw_text(&mut self, label: Label);
    /// Erase all text (entities are kept)
    fn clear_text(&mut self);
    fn flush(&mut self);
    /// Drop every entity and all text
    fn clear_all(&mut self);
}
