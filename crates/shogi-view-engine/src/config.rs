//! Render configuration.

use crate::board::BOARD_SIZE;
use crate::paint::Color;

/// Visual parameters of the board view.
///
/// The defaults reproduce the classic look: white page, translucent orange
/// field, black 4px grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Playable cells per side.
    pub board_size: u32,
    /// Fill for the whole surface before anything else is drawn.
    pub background: Color,
    /// Fill for the board field under the grid.
    pub field_fill: Color,
    pub grid_line: Color,
    /// Grid stroke width in surface pixels.
    pub grid_line_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            background: Color::white(),
            field_fill: Color::from_argb_u32(0x5EFF7800),
            grid_line: Color::black(),
            grid_line_width: 4.0,
        }
    }
}
