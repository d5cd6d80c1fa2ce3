//! Paint model used by the canvas.
//!
//! Only solid colors are needed by the board view. Geometry lives in `coords`.

pub mod color;

pub use color::Color;
