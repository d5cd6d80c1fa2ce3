use std::time::{Duration, Instant};

/// Timing snapshot of one presented frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous presented frame; `None` for the first frame.
    pub since_previous: Option<Duration>,

    /// Monotonic timestamp taken when the frame was presented.
    pub now: Instant,

    /// Zero-based count of presented frames.
    pub frame_index: u64,
}

/// Produces [`FrameTime`] snapshots.
///
/// Unlike a simulation clock there is no clamping: the board only repaints on
/// demand, so long gaps between frames are normal.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a presented frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let ft = FrameTime {
            since_previous: self.last.map(|last| now.saturating_duration_since(last)),
            now,
            frame_index: self.frame_index,
        };

        self.last = Some(now);
        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
