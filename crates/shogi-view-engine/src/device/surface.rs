use crate::render::Canvas;

/// Provider of drawable frame buffers.
///
/// The render loop calls [`acquire_frame_buffer`](Surface::acquire_frame_buffer)
/// once per wake, draws into the returned canvas, and hands it back through
/// [`present_frame_buffer`](Surface::present_frame_buffer). Both calls happen on
/// the render thread, never concurrently.
pub trait Surface: Send + 'static {
    /// Returns a canvas sized to the current surface, or `None` when the
    /// surface is not ready (e.g. not yet created, zero-sized, being resized).
    fn acquire_frame_buffer(&mut self) -> Option<Canvas>;

    /// Displays a finished frame.
    fn present_frame_buffer(&mut self, canvas: Canvas);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn acquire_frame_buffer(&mut self) -> Option<Canvas> {
        (**self).acquire_frame_buffer()
    }

    fn present_frame_buffer(&mut self, canvas: Canvas) {
        (**self).present_frame_buffer(canvas)
    }
}

/// Result of one render-loop wake.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// A frame was drawn and presented.
    Presented,
    /// The surface had no frame buffer; nothing was drawn.
    SkippedNotReady,
}
