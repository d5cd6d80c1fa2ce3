use image::{Pixel, Rgba, RgbaImage, imageops};

use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::Color;

/// Drawable frame buffer.
///
/// Owned by exactly one renderer between `acquire_frame_buffer` and
/// `present_frame_buffer`, so drawing needs no synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::from_pixels(self.width(), self.height())
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Replaces every pixel with `color` (no blending).
    pub fn clear(&mut self, color: Color) {
        let px = color.to_rgba8();
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Fills `rect` with `color`, compositing source-over when translucent.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.covered_span(rect) else {
            return;
        };

        let src = color.to_rgba8();
        let opaque = color.is_opaque();

        for y in y0..y1 {
            for x in x0..x1 {
                let dst = self.pixels.get_pixel_mut(x, y);
                if opaque {
                    *dst = src;
                } else {
                    dst.blend(&src);
                }
            }
        }
    }

    /// Strokes a horizontal or vertical segment `from → to` with butt caps.
    ///
    /// The stroke is a rectangle `width` thick centred on the segment. Slanted
    /// segments are not supported and draw nothing.
    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if !(width > 0.0) {
            return;
        }
        let half = width * 0.5;
        let rect = if from.x == to.x {
            Rect::from_corners(Vec2::new(from.x - half, from.y), Vec2::new(to.x + half, to.y))
        } else if from.y == to.y {
            Rect::from_corners(Vec2::new(from.x, from.y - half), Vec2::new(to.x, to.y + half))
        } else {
            log::debug!("slanted stroke {from:?} -> {to:?} skipped");
            return;
        };
        self.fill_rect(rect, color);
    }

    /// Composites `image` with its top-left corner at `(x, y)`.
    ///
    /// Parts outside the canvas are clipped.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.pixels, image, x, y);
    }

    /// Pixel index range `[x0, x1) × [y0, y1)` whose centers fall inside `rect`,
    /// clipped to the canvas.
    fn covered_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        if rect.is_empty() || !rect.is_finite() {
            return None;
        }

        let first = |v: f32, limit: u32| (v - 0.5).ceil().clamp(0.0, limit as f32) as u32;
        let x0 = first(rect.min.x, self.width());
        let y0 = first(rect.min.y, self.height());
        let x1 = first(rect.max.x, self.width());
        let y1 = first(rect.max.y, self.height());

        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }
}
