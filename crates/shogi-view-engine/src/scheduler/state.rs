use parking_lot::{Condvar, Mutex};

/// Scheduler lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    Stopped,
    Running,
}

#[derive(Debug)]
struct LoopState {
    lifecycle: Lifecycle,
    /// A flag, not a counter: any number of requests collapse into one frame.
    redraw_pending: bool,
    /// A render thread exists and has not yet observed `Stopped`.
    loop_alive: bool,
}

/// What the render thread should do after waking.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Wake {
    Render,
    Exit,
}

/// Condition-protected scheduling state shared by callers and the render thread.
#[derive(Debug)]
pub(crate) struct Signal {
    state: Mutex<LoopState>,
    wake: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(LoopState {
                lifecycle: Lifecycle::Stopped,
                redraw_pending: false,
                loop_alive: false,
            }),
            wake: Condvar::new(),
        }
    }

    /// Marks a redraw as pending and wakes the loop. Never blocks on rendering.
    pub(crate) fn request_redraw(&self) {
        let mut st = self.state.lock();
        st.redraw_pending = true;
        self.wake.notify_one();
    }

    /// Enters `Running`. Returns `true` when no loop is alive and the caller
    /// must spawn one; the loop is then considered alive.
    pub(crate) fn start(&self) -> bool {
        let mut st = self.state.lock();
        st.lifecycle = Lifecycle::Running;
        if st.loop_alive {
            self.wake.notify_one();
            return false;
        }
        st.loop_alive = true;
        true
    }

    /// Rolls back a [`start`](Self::start) whose thread could not be spawned.
    pub(crate) fn abort_start(&self) {
        let mut st = self.state.lock();
        st.lifecycle = Lifecycle::Stopped;
        st.loop_alive = false;
    }

    /// Enters `Stopped` and wakes an idle loop so it can exit.
    ///
    /// A frame in progress is not interrupted.
    pub(crate) fn stop(&self) {
        let mut st = self.state.lock();
        st.lifecycle = Lifecycle::Stopped;
        self.wake.notify_all();
    }

    /// Blocks until there is a frame to draw or the scheduler stopped.
    ///
    /// `Stopped` wins over a pending redraw; the request stays pending for a
    /// later start. Spurious wake-ups just re-check the flags.
    pub(crate) fn wait_for_work(&self) -> Wake {
        let mut st = self.state.lock();
        loop {
            if st.lifecycle == Lifecycle::Stopped {
                st.loop_alive = false;
                return Wake::Exit;
            }
            if st.redraw_pending {
                st.redraw_pending = false;
                return Wake::Render;
            }
            self.wake.wait(&mut st);
        }
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.state.lock().lifecycle
    }

    pub(crate) fn is_redraw_pending(&self) -> bool {
        self.state.lock().redraw_pending
    }

    pub(crate) fn is_loop_alive(&self) -> bool {
        self.state.lock().loop_alive
    }
}
