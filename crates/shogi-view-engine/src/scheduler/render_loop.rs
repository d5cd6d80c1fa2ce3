use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::board::{FrameRenderer, GridLayout};
use crate::device::{FrameOutcome, Surface};
use crate::time::{FrameClock, FrameTime};

use super::state::{Lifecycle, Signal, Wake};

/// Name given to the dedicated render thread.
pub const RENDER_THREAD_NAME: &str = "board-render";

/// State readable by callers without touching frame production.
#[derive(Debug)]
struct Shared {
    signal: Signal,
    layout: Mutex<Option<GridLayout>>,
    last_frame: Mutex<Option<FrameTime>>,
    presented: AtomicU64,
    skipped: AtomicU64,
    cache_rebuilds: AtomicU64,
}

/// Everything one frame needs. Only the render thread locks this while drawing.
struct Producer<S> {
    surface: S,
    renderer: FrameRenderer,
    clock: FrameClock,
}

impl<S: Surface> Producer<S> {
    /// Draws and presents one frame, publishing its layout, timing and cache
    /// statistics before returning.
    fn produce(&mut self, shared: &Shared) -> FrameOutcome {
        let Some(mut canvas) = self.surface.acquire_frame_buffer() else {
            return FrameOutcome::SkippedNotReady;
        };

        let layout = self.renderer.render_frame(&mut canvas);
        self.surface.present_frame_buffer(canvas);

        let ft = self.clock.tick();
        log::trace!("presented frame {} ({:?} since previous)", ft.frame_index, ft.since_previous);

        *shared.layout.lock() = Some(layout);
        *shared.last_frame.lock() = Some(ft);
        shared
            .cache_rebuilds
            .store(self.renderer.cache().rebuild_count(), Ordering::Relaxed);

        FrameOutcome::Presented
    }
}

/// On-demand renderer for a board view.
///
/// Created stopped. [`start`](Self::start) spawns the render thread;
/// [`request_redraw`](Self::request_redraw) schedules a frame from any thread;
/// [`stop`](Self::stop) + [`join`](Self::join) shut it down. Requests arriving
/// faster than frames are drawn are merged: one frame per wake, however many
/// requests preceded it.
///
/// ```rust,ignore
/// let store = PieceStore::new();
/// let scheduler = RenderScheduler::new(surface, FrameRenderer::new(store.clone(), RenderConfig::default()));
/// scheduler.start()?;
///
/// store.move_piece(id, 4, 4);
/// scheduler.request_redraw();
///
/// scheduler.stop();
/// scheduler.join();
/// ```
pub struct RenderScheduler<S: Surface> {
    shared: Arc<Shared>,
    producer: Arc<Mutex<Producer<S>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<S: Surface> RenderScheduler<S> {
    pub fn new(surface: S, renderer: FrameRenderer) -> Self {
        Self {
            shared: Arc::new(Shared {
                signal: Signal::new(),
                layout: Mutex::new(None),
                last_frame: Mutex::new(None),
                presented: AtomicU64::new(0),
                skipped: AtomicU64::new(0),
                cache_rebuilds: AtomicU64::new(0),
            }),
            producer: Arc::new(Mutex::new(Producer {
                surface,
                renderer,
                clock: FrameClock::new(),
            })),
            handle: Mutex::new(None),
        }
    }

    /// Enters `Running`, spawning the render thread if none is alive.
    ///
    /// A redraw requested while stopped is drawn right away.
    pub fn start(&self) -> Result<()> {
        if !self.shared.signal.start() {
            return Ok(());
        }

        let mut handle = self.handle.lock();
        if let Some(previous) = handle.take() {
            // That loop already observed `Stopped`; it is on its way out.
            if previous.join().is_err() {
                log::error!("previous render thread panicked");
            }
        }

        let shared = Arc::clone(&self.shared);
        let producer = Arc::clone(&self.producer);
        let spawned = thread::Builder::new()
            .name(RENDER_THREAD_NAME.to_string())
            .spawn(move || run_loop(&shared, &producer));

        match spawned {
            Ok(h) => {
                *handle = Some(h);
                Ok(())
            }
            Err(e) => {
                self.shared.signal.abort_start();
                Err(e).context("failed to spawn render thread")
            }
        }
    }

    /// Enters `Stopped`. A frame in progress still completes and is presented;
    /// the loop exits the next time it checks for work.
    pub fn stop(&self) {
        self.shared.signal.stop();
    }

    /// Schedules a frame. Fire-and-forget; never waits for rendering.
    pub fn request_redraw(&self) {
        self.shared.signal.request_redraw();
    }

    /// Waits for the render thread to exit. Call after [`stop`](Self::stop);
    /// a running loop never exits on its own.
    pub fn join(&self) {
        let handle = self.handle.lock().take();
        if let Some(h) = handle {
            if h.join().is_err() {
                log::error!("render thread panicked");
            }
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.signal.lifecycle()
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.shared.signal.is_redraw_pending()
    }

    /// True while a render thread exists and has not observed `Stopped`.
    pub fn is_loop_alive(&self) -> bool {
        self.shared.signal.is_loop_alive()
    }

    /// Layout of the most recently presented frame.
    pub fn layout(&self) -> Option<GridLayout> {
        *self.shared.layout.lock()
    }

    /// Cell width of the last presented frame; `0.0` before the first one.
    pub fn cell_width(&self) -> f32 {
        self.layout().map_or(0.0, |l| l.cell_width)
    }

    /// Cell height of the last presented frame; `0.0` before the first one.
    pub fn cell_height(&self) -> f32 {
        self.layout().map_or(0.0, |l| l.cell_height)
    }

    pub fn frames_presented(&self) -> u64 {
        self.shared.presented.load(Ordering::Acquire)
    }

    /// Wakes that found the surface not ready.
    pub fn frames_skipped(&self) -> u64 {
        self.shared.skipped.load(Ordering::Relaxed)
    }

    pub fn last_frame_time(&self) -> Option<FrameTime> {
        *self.shared.last_frame.lock()
    }

    /// Scale-cache rebuilds as of the last presented frame.
    ///
    /// Like every accessor here it never waits on a frame in progress, so it is
    /// safe to call while holding a [`PieceStore`](crate::board::PieceStore) guard.
    pub fn cache_rebuilds(&self) -> u64 {
        self.shared.cache_rebuilds.load(Ordering::Relaxed)
    }
}

impl<S: Surface> Drop for RenderScheduler<S> {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

fn run_loop<S: Surface>(shared: &Shared, producer: &Mutex<Producer<S>>) {
    log::debug!("render loop started");

    while shared.signal.wait_for_work() == Wake::Render {
        // The signal lock is released here; requests keep landing while we draw.
        let outcome = producer.lock().produce(shared);
        match outcome {
            FrameOutcome::Presented => {
                shared.presented.fetch_add(1, Ordering::Release);
            }
            FrameOutcome::SkippedNotReady => {
                shared.skipped.fetch_add(1, Ordering::Relaxed);
                log::trace!("surface not ready; frame skipped");
            }
        }
    }

    log::debug!("render loop exited");
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossbeam_channel::{Receiver, Sender, unbounded};
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::board::{PieceAsset, PieceStore};
    use crate::config::RenderConfig;
    use crate::device::MemorySurface;
    use crate::render::Canvas;

    const SETTLE: Duration = Duration::from_millis(50);

    fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn scheduler_for(surface: MemorySurface, store: &PieceStore) -> RenderScheduler<MemorySurface> {
        RenderScheduler::new(surface, FrameRenderer::new(store.clone(), RenderConfig::default()))
    }

    /// Surface that parks the render thread inside `acquire_frame_buffer`
    /// until the test releases it.
    struct GatedSurface {
        inner: MemorySurface,
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl Surface for GatedSurface {
        fn acquire_frame_buffer(&mut self) -> Option<Canvas> {
            let _ = self.entered.send(());
            let _ = self.release.recv_timeout(Duration::from_secs(5));
            self.inner.acquire_frame_buffer()
        }

        fn present_frame_buffer(&mut self, canvas: Canvas) {
            self.inner.present_frame_buffer(canvas);
        }
    }

    struct Gate {
        scheduler: RenderScheduler<GatedSurface>,
        store: PieceStore,
        observer: MemorySurface,
        entered: Receiver<()>,
        release: Sender<()>,
    }

    fn gated() -> Gate {
        let (entered_tx, entered_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        let observer = MemorySurface::new(110, 90);
        let surface = GatedSurface {
            inner: observer.clone(),
            entered: entered_tx,
            release: release_rx,
        };
        let store = PieceStore::new();
        let scheduler = RenderScheduler::new(
            surface,
            FrameRenderer::new(store.clone(), RenderConfig::default()),
        );
        Gate {
            scheduler,
            store,
            observer,
            entered: entered_rx,
            release: release_tx,
        }
    }

    impl Gate {
        fn await_render_entry(&self) {
            self.entered
                .recv_timeout(Duration::from_secs(5))
                .expect("render thread never reached the surface");
        }

        fn release_one(&self) {
            self.release.send(()).unwrap();
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn requests_while_stopped_wait_for_start() {
        for n in [1, 2, 5, 100] {
            let surface = MemorySurface::new(110, 90);
            let scheduler = scheduler_for(surface.clone(), &PieceStore::new());

            for _ in 0..n {
                scheduler.request_redraw();
            }
            thread::sleep(SETTLE);
            assert_eq!(surface.presented_count(), 0, "n={n}");
            assert_eq!(scheduler.lifecycle(), Lifecycle::Stopped);
            assert!(scheduler.is_redraw_pending());

            scheduler.start().unwrap();
            wait_until("first frame", || surface.presented_count() == 1);
            thread::sleep(SETTLE);
            assert_eq!(surface.presented_count(), 1, "n={n}");
            assert!(!scheduler.is_redraw_pending());

            scheduler.stop();
            scheduler.join();
            assert!(!scheduler.is_loop_alive());
        }
    }

    #[test]
    fn idle_loop_draws_nothing_and_stops_promptly() {
        let surface = MemorySurface::new(110, 90);
        let scheduler = scheduler_for(surface.clone(), &PieceStore::new());
        scheduler.start().unwrap();
        wait_until("loop alive", || scheduler.is_loop_alive());

        thread::sleep(SETTLE);
        assert_eq!(surface.presented_count(), 0);

        scheduler.stop();
        scheduler.join();
        assert!(!scheduler.is_loop_alive());
        assert_eq!(surface.presented_count(), 0);
    }

    #[test]
    fn restart_after_stop_resumes_rendering() {
        let surface = MemorySurface::new(110, 90);
        let scheduler = scheduler_for(surface.clone(), &PieceStore::new());

        scheduler.start().unwrap();
        scheduler.request_redraw();
        wait_until("first frame", || surface.presented_count() == 1);
        scheduler.stop();
        scheduler.join();

        scheduler.request_redraw();
        thread::sleep(SETTLE);
        assert_eq!(surface.presented_count(), 1);

        scheduler.start().unwrap();
        wait_until("second frame", || surface.presented_count() == 2);
        assert_eq!(scheduler.frames_presented(), 2);
    }

    #[test]
    fn dropping_a_running_scheduler_joins_the_thread() {
        let surface = MemorySurface::new(110, 90);
        let scheduler = scheduler_for(surface.clone(), &PieceStore::new());
        scheduler.start().unwrap();
        scheduler.request_redraw();
        wait_until("frame", || surface.presented_count() == 1);

        drop(scheduler);
        assert_eq!(surface.presented_count(), 1);
    }

    // ── coalescing ────────────────────────────────────────────────────────

    #[test]
    fn burst_during_a_frame_yields_exactly_one_more_frame() {
        for n in [1, 2, 5, 100] {
            let gate = gated();
            gate.scheduler.start().unwrap();
            gate.scheduler.request_redraw();
            gate.await_render_entry();

            for _ in 0..n {
                gate.scheduler.request_redraw();
            }
            gate.release_one();

            gate.await_render_entry();
            gate.release_one();
            wait_until("second frame", || gate.observer.presented_count() == 2);

            assert!(
                gate.entered.recv_timeout(SETTLE).is_err(),
                "n={n}: a third frame was started"
            );
            assert_eq!(gate.observer.presented_count(), 2, "n={n}");

            gate.scheduler.stop();
            gate.scheduler.join();
        }
    }

    // ── cancellation ──────────────────────────────────────────────────────

    #[test]
    fn stop_during_a_frame_still_presents_it() {
        let gate = gated();
        gate.scheduler.start().unwrap();
        gate.scheduler.request_redraw();
        gate.await_render_entry();

        gate.scheduler.stop();
        gate.scheduler.request_redraw();
        assert_eq!(gate.scheduler.lifecycle(), Lifecycle::Stopped);
        gate.release_one();

        gate.scheduler.join();
        assert_eq!(gate.observer.presented_count(), 1);
        assert!(!gate.scheduler.is_loop_alive());
        // The late request survives for the next start.
        assert!(gate.scheduler.is_redraw_pending());
    }

    // ── surface readiness ─────────────────────────────────────────────────

    #[test]
    fn unready_surface_skips_without_retrying() {
        let surface = MemorySurface::new(110, 90);
        surface.set_ready(false);
        let scheduler = scheduler_for(surface.clone(), &PieceStore::new());
        scheduler.start().unwrap();

        scheduler.request_redraw();
        wait_until("skip", || scheduler.frames_skipped() == 1);
        thread::sleep(SETTLE);
        assert_eq!(scheduler.frames_skipped(), 1);
        assert_eq!(surface.presented_count(), 0);
        assert!(scheduler.layout().is_none());

        surface.set_ready(true);
        scheduler.request_redraw();
        wait_until("frame", || surface.presented_count() == 1);
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[test]
    fn cell_metrics_follow_the_last_frame() {
        let surface = MemorySurface::new(1100, 900);
        let scheduler = scheduler_for(surface.clone(), &PieceStore::new());
        assert_eq!(scheduler.cell_width(), 0.0);
        assert_eq!(scheduler.cell_height(), 0.0);

        scheduler.start().unwrap();
        scheduler.request_redraw();
        wait_until("frame", || scheduler.frames_presented() == 1);
        assert_eq!(scheduler.cell_width(), 100.0);
        assert_eq!(scheduler.cell_height(), 100.0);
        assert_eq!(scheduler.layout().unwrap().field_dimension, 900.0);
        assert_eq!(scheduler.last_frame_time().unwrap().frame_index, 0);

        surface.resize(2200, 450);
        scheduler.request_redraw();
        wait_until("frame", || scheduler.frames_presented() == 2);
        assert_eq!(scheduler.cell_width(), 200.0);
        assert_eq!(scheduler.cell_height(), 50.0);
    }

    #[test]
    fn resize_rebuilds_the_cache_once() {
        let store = PieceStore::new();
        let asset = PieceAsset::from_image(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
        for col in 0..9 {
            store.insert(2, col, asset.clone());
        }
        let surface = MemorySurface::new(1100, 900);
        let scheduler = scheduler_for(surface.clone(), &store);
        scheduler.start().unwrap();

        scheduler.request_redraw();
        wait_until("frame 1", || scheduler.frames_presented() == 1);
        surface.resize(550, 450);
        scheduler.request_redraw();
        wait_until("frame 2", || scheduler.frames_presented() == 2);
        scheduler.request_redraw();
        wait_until("frame 3", || scheduler.frames_presented() == 3);

        assert_eq!(scheduler.cache_rebuilds(), 2);
        assert_eq!(scheduler.layout().unwrap().scaled_side(), 50);
    }

    #[test]
    fn accessors_do_not_wait_on_a_frame_blocked_by_the_store() {
        let gate = gated();
        gate.store
            .insert(0, 0, PieceAsset::from_image(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))));
        gate.scheduler.start().unwrap();
        gate.scheduler.request_redraw();
        gate.await_render_entry();

        // The render thread now owns the frame; once released it needs this guard.
        let guard = gate.store.lock();
        gate.release_one();

        assert_eq!(gate.scheduler.cache_rebuilds(), 0);
        assert!(gate.scheduler.layout().is_none());
        assert_eq!(gate.scheduler.cell_width(), 0.0);
        assert_eq!(gate.scheduler.frames_presented(), 0);
        assert_eq!(guard.len(), 1);
        drop(guard);

        wait_until("frame", || gate.scheduler.frames_presented() == 1);
        assert_eq!(gate.scheduler.cache_rebuilds(), 1);

        gate.scheduler.stop();
        gate.scheduler.join();
    }

    // ── concurrent mutation ───────────────────────────────────────────────

    #[test]
    fn concurrent_mutators_see_their_final_state_rendered() {
        let red = Rgba([220, 0, 0, 255]);
        let store = PieceStore::new();
        let asset = PieceAsset::from_image(RgbaImage::from_pixel(10, 10, red));
        let ids: Vec<_> = (0..4).map(|i| store.insert(0, i, asset.clone())).collect();

        let surface = MemorySurface::new(1100, 900);
        let scheduler = Arc::new(scheduler_for(surface.clone(), &store));
        scheduler.start().unwrap();

        let workers: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(lane, &id)| {
                let store = store.clone();
                let scheduler = Arc::clone(&scheduler);
                thread::spawn(move || {
                    for row in 0..9 {
                        store.move_piece(id, row, lane as i32 * 2);
                        scheduler.request_redraw();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        let before = scheduler.frames_presented();
        scheduler.request_redraw();
        wait_until("final frame", || scheduler.frames_presented() > before);
        assert!(scheduler.frames_presented() <= 4 * 9 + 1);

        let frame = surface.last_frame().unwrap();
        for lane in 0..4u32 {
            // Row 8, column lane*2: cell origin (100 + lane*200, 800).
            assert_eq!(frame.pixel(150 + lane * 200, 850), Some(red), "lane {lane}");
        }

        scheduler.stop();
        scheduler.join();
    }
}
