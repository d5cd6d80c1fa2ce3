//! Drawable surface providers.
//!
//! This module is responsible for:
//! - the [`Surface`] contract the render loop acquires and presents frames through
//! - an in-memory implementation for headless hosts and tests

mod memory;
mod surface;

pub use memory::MemorySurface;
pub use surface::{FrameOutcome, Surface};
