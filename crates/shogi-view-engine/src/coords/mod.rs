//! Geometry types shared by the layout engine and the canvas.
//!
//! Canonical space:
//! - surface pixels
//! - origin top-left
//! - +X right, +Y down

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
