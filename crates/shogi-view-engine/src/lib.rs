//! Shogi board view engine.
//!
//! This crate owns the headless pieces of the board view: the shared piece
//! store, grid layout, bitmap scaling, frame drawing and the on-demand render
//! thread that ties them to a [`device::Surface`].

pub mod board;
pub mod config;
pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scheduler;
pub mod time;
