use crate::config::RenderConfig;
use crate::render::Canvas;

use super::layout::GridLayout;
use super::scale_cache::ScaleCache;
use super::store::PieceStore;

/// Draws complete board frames.
///
/// Owns the scale cache; lives on the render thread.
#[derive(Debug)]
pub struct FrameRenderer {
    config: RenderConfig,
    store: PieceStore,
    cache: ScaleCache,
}

impl FrameRenderer {
    pub fn new(store: PieceStore, config: RenderConfig) -> Self {
        Self {
            config,
            store,
            cache: ScaleCache::new(),
        }
    }

    pub fn cache(&self) -> &ScaleCache {
        &self.cache
    }

    /// Renders one frame into `canvas` and returns the layout it used.
    ///
    /// Order: background, field fill, grid, pieces in store order. The store
    /// lock is held from the cache freshness check through the last blit.
    pub fn render_frame(&mut self, canvas: &mut Canvas) -> GridLayout {
        canvas.clear(self.config.background);

        let layout = GridLayout::compute(canvas.viewport(), self.config.board_size);
        log::trace!(
            "cell size: width={} height={} dim={}",
            layout.cell_width,
            layout.cell_height,
            layout.cell_dimension
        );

        canvas.fill_rect(layout.field_rect(), self.config.field_fill);

        let stroke = self.config.grid_line_width;
        for (from, to) in layout.vertical_lines().chain(layout.horizontal_lines()) {
            canvas.stroke_line(from, to, stroke, self.config.grid_line);
        }

        let pieces = self.store.lock();
        self.cache.ensure_fresh(layout.scaled_side(), &pieces);

        for (piece, scaled) in pieces.iter().zip(self.cache.iter()) {
            let at = layout.cell_origin(piece.row(), piece.col());
            canvas.draw_image(scaled, at.x.floor() as i64, at.y.floor() as i64);
        }

        layout
    }
}
