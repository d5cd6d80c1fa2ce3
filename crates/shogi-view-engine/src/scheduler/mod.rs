//! Redraw scheduling.
//!
//! A [`RenderScheduler`] owns one dedicated render thread. Callers on any
//! thread mutate the [`PieceStore`](crate::board::PieceStore) and then call
//! [`request_redraw`](RenderScheduler::request_redraw); the render thread wakes,
//! draws one frame and goes back to sleep.
//!
//! ```text
//!   mutator 1 ──┐  request_redraw()   ┌──────────────┐   acquire / render / present
//!   mutator 2 ──┼───────────────────> │ pending flag │ ──────────────────────────> Surface
//!   mutator N ──┘   (coalesced)       └──────────────┘      (render thread)
//! ```
//!
//! Locks, never nested:
//! - signal lock: lifecycle + pending flag + condvar; held only for flag flips
//! - store lock: piece list; held by the renderer for the piece pass of a frame
//! - producer lock: surface + renderer + scale cache; held for a whole frame

mod render_loop;
mod state;

pub use render_loop::{RENDER_THREAD_NAME, RenderScheduler};
pub use state::Lifecycle;
