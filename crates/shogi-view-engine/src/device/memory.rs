use std::sync::Arc;

use parking_lot::Mutex;

use crate::render::Canvas;

use super::Surface;

#[derive(Debug)]
struct MemoryState {
    width: u32,
    height: u32,
    ready: bool,
    presented: u64,
    last_frame: Option<Canvas>,
}

/// Headless surface backed by plain memory.
///
/// Cloning yields another handle to the same surface, so a host can keep one
/// handle for resizing/inspection while the render loop owns the other.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySurface {
    /// Creates a ready surface of `width × height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                width,
                height,
                ready: true,
                presented: 0,
                last_frame: None,
            })),
        }
    }

    /// Changes the size of subsequently acquired frame buffers.
    pub fn resize(&self, width: u32, height: u32) {
        let mut st = self.state.lock();
        st.width = width;
        st.height = height;
    }

    /// Marks the surface as (un)available; while unavailable no frame buffer is handed out.
    pub fn set_ready(&self, ready: bool) {
        self.state.lock().ready = ready;
    }

    /// Number of frames presented so far.
    pub fn presented_count(&self) -> u64 {
        self.state.lock().presented
    }

    /// Copy of the most recently presented frame.
    pub fn last_frame(&self) -> Option<Canvas> {
        self.state.lock().last_frame.clone()
    }
}

impl Surface for MemorySurface {
    fn acquire_frame_buffer(&mut self) -> Option<Canvas> {
        let st = self.state.lock();
        if !st.ready || st.width == 0 || st.height == 0 {
            return None;
        }
        Some(Canvas::new(st.width, st.height))
    }

    fn present_frame_buffer(&mut self, canvas: Canvas) {
        let mut st = self.state.lock();
        st.presented += 1;
        st.last_frame = Some(canvas);
    }
}
