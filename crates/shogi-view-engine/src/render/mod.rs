//! CPU rendering primitives.
//!
//! Frames are drawn into a [`Canvas`], an owned RGBA pixel buffer handed out by
//! a [`Surface`](crate::device::Surface) and handed back to it for presentation.
//!
//! Convention:
//! - geometry is in surface pixels (top-left origin, +Y down)
//! - a pixel is covered when its center lies inside the shape

mod canvas;

pub use canvas::Canvas;
