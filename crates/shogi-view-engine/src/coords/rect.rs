use super::Vec2;

/// Axis-aligned rectangle in surface pixels, kept as ordered corners
/// (`min` top-left, `max` bottom-right).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// `x`/`y` is one corner; a negative `w`/`h` extends left/up from it.
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_corners(Vec2::new(x, y), Vec2::new(x + w, y + h))
    }

    #[inline]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::from_corners(origin, origin + size)
    }

    /// Rectangle spanning two corner points, in any order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    /// Zero area (NaN extents count as empty).
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// `[min, max)` on both axes, so neighbouring cells never both claim an edge.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }
}
