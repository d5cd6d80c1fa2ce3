use crate::coords::{Rect, Vec2, Viewport};

/// Playable cells per side of a Shogi board.
pub const BOARD_SIZE: u32 = 9;

/// Extra cell columns reserved horizontally for captured-piece trays
/// (one left of the board, one right of it).
pub const TRAY_COLUMNS: u32 = 2;

/// Largest board side `compute` accepts; bigger requests are clamped to it.
const MAX_BOARD_SIZE: u32 = u16::MAX as u32;

/// Per-frame cell metrics derived from the surface size.
///
/// - `cell_width = width / (board_size + TRAY_COLUMNS)`
/// - `cell_height = height / board_size`
/// - `cell_dimension = min(cell_width, cell_height)` (cells are always square)
/// - `field_dimension = cell_dimension * board_size`
///
/// The board field starts one `cell_dimension` right of the surface's left
/// edge and at the top edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridLayout {
    pub board_size: u32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub cell_dimension: f32,
    pub field_dimension: f32,
}

impl GridLayout {
    pub fn compute(viewport: Viewport, board_size: u32) -> Self {
        let board_size = board_size.clamp(1, MAX_BOARD_SIZE);

        let cell_width = viewport.width / (board_size + TRAY_COLUMNS) as f32;
        let cell_height = viewport.height / board_size as f32;
        let cell_dimension = cell_width.min(cell_height);

        Self {
            board_size,
            cell_width,
            cell_height,
            cell_dimension,
            field_dimension: cell_dimension * board_size as f32,
        }
    }

    /// Top-left corner of the board field.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.cell_dimension, 0.0)
    }

    #[inline]
    pub fn field_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), Vec2::new(self.field_dimension, self.field_dimension))
    }

    /// Integer side length of scaled piece bitmaps.
    #[inline]
    pub fn scaled_side(&self) -> u32 {
        // `as` saturates: NaN and negatives become 0.
        self.cell_dimension as u32
    }

    /// Clamps a board coordinate into `[0, board_size - 1]` on both axes.
    #[inline]
    pub fn clamp_cell(&self, row: i32, col: i32) -> (u32, u32) {
        let last = (self.board_size - 1) as i32;
        (row.clamp(0, last) as u32, col.clamp(0, last) as u32)
    }

    /// Pixel position of the top-left corner of cell `(row, col)`.
    ///
    /// Out-of-range coordinates land on the nearest edge cell.
    pub fn cell_origin(&self, row: i32, col: i32) -> Vec2 {
        let (row, col) = self.clamp_cell(row, col);
        self.origin() + Vec2::new(col as f32, row as f32) * self.cell_dimension
    }

    /// Board cell `(row, col)` under a surface point, or `None` off the field.
    pub fn cell_at(&self, p: Vec2) -> Option<(u32, u32)> {
        if !(self.cell_dimension > 0.0) || !self.field_rect().contains(p) {
            return None;
        }
        let last = self.board_size - 1;
        let col = ((p.x - self.cell_dimension) / self.cell_dimension) as u32;
        let row = (p.y / self.cell_dimension) as u32;
        Some((row.min(last), col.min(last)))
    }

    /// Vertical grid segments, left to right (`board_size + 1` lines).
    pub fn vertical_lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> {
        let cd = self.cell_dimension;
        let fd = self.field_dimension;
        (1..=self.board_size + 1).map(move |i| {
            let x = i as f32 * cd;
            (Vec2::new(x, 0.0), Vec2::new(x, fd))
        })
    }

    /// Horizontal grid segments, top to bottom (`board_size + 1` lines).
    pub fn horizontal_lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> {
        let cd = self.cell_dimension;
        let fd = self.field_dimension;
        (0..=self.board_size).map(move |i| {
            let y = i as f32 * cd;
            (Vec2::new(cd, y), Vec2::new(cd + fd, y))
        })
    }
}
