//! Frame pumping for hosts that run on `std`.
//!
//! A [`StdRuntime`] owns the [`FrameClock`] a document hands deferred work
//! to. Queuing a callback raises a frame request; the host loop answers it
//! with [`StdRuntime::run_requested_frames`], which lays out and then drains
//! the clock stamped with time since the runtime started.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glide_core::{Clock, FrameClock, RuntimeScheduler};
use web_time::Instant;

/// Frames answered per pump before giving up on callbacks that keep
/// queuing more work.
pub const MAX_FRAMES_PER_PUMP: usize = 8;

/// Scheduler that only remembers that a frame was asked for.
#[derive(Debug, Default)]
struct FrameRequests {
    pending: Cell<bool>,
}

impl RuntimeScheduler for FrameRequests {
    fn schedule_frame(&self) {
        self.pending.set(true);
    }
}

/// Wall clock backed by [`web_time`], so wasm hosts get the same source.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed_nanos(&self, since: Self::Instant) -> u64 {
        u64::try_from(since.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

#[derive(Clone)]
pub struct StdRuntime {
    requests: Rc<FrameRequests>,
    frame_clock: FrameClock,
    clock: StdClock,
    started: Instant,
}

impl StdRuntime {
    pub fn new() -> Self {
        let requests = Rc::new(FrameRequests::default());
        let frame_clock = FrameClock::with_scheduler(requests.clone());
        let clock = StdClock;
        Self {
            requests,
            frame_clock,
            clock,
            started: clock.now(),
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.frame_clock.clone()
    }

    /// Whether a frame was requested since the last call. Clears the request.
    pub fn take_frame_request(&self) -> bool {
        self.requests.pending.replace(false)
    }

    /// Nanoseconds since this runtime was created.
    pub fn frame_time_nanos(&self) -> u64 {
        self.clock.elapsed_nanos(self.started)
    }

    /// Drains post-layout callbacks at the current frame time.
    pub fn finish_frame(&self) {
        self.frame_clock
            .drain_frame_callbacks(self.frame_time_nanos());
    }

    /// Runs `layout` then [`finish_frame`](Self::finish_frame) for as long as
    /// frames keep being requested, up to [`MAX_FRAMES_PER_PUMP`]. Returns the
    /// number of frames run.
    pub fn run_requested_frames(&self, mut layout: impl FnMut()) -> usize {
        let mut frames = 0;
        while frames < MAX_FRAMES_PER_PUMP && self.take_frame_request() {
            layout();
            self.finish_frame();
            frames += 1;
        }
        if frames == MAX_FRAMES_PER_PUMP && self.requests.pending.get() {
            log::warn!("frame callbacks still pending after {frames} frames");
        } else if frames > 0 {
            log::trace!("ran {frames} requested frame(s) at {}ns", self.frame_time_nanos());
        }
        frames
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("frame_requested", &self.requests.pending.get())
            .field("frame_clock", &self.frame_clock)
            .finish()
    }
}
