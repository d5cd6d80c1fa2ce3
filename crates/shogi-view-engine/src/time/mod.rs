//! Frame timing.
//!
//! The render loop owns one [`FrameClock`] and ticks it once per presented
//! frame, so intervals measure presentation cadence, not wake-ups.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
