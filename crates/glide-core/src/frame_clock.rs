//! Post-layout frame callbacks.
//!
//! Widgets that need measurements taken after their own state change has been
//! laid out register a one-shot callback here. The host drains the queue once
//! per frame, after layout has completed, passing the frame time.

use crate::platform::RuntimeScheduler;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct FrameClockInner {
    callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_callback_id: Cell<FrameCallbackId>,
    last_frame_nanos: Cell<Option<u64>>,
    scheduler: Option<Rc<dyn RuntimeScheduler>>,
}

impl FrameClockInner {
    fn register(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_callback_id.get();
        self.next_callback_id.set(id + 1);
        self.callbacks.borrow_mut().push_back(FrameCallbackEntry {
            id,
            callback: Some(callback),
        });
        if let Some(scheduler) = &self.scheduler {
            scheduler.schedule_frame();
        }
        id
    }

    fn cancel(&self, id: FrameCallbackId) {
        let mut callbacks = self.callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn is_pending(&self, id: FrameCallbackId) -> bool {
        self.callbacks.borrow().iter().any(|entry| entry.id == id)
    }
}

#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<FrameClockInner>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A clock that asks `scheduler` for a frame whenever a callback is queued.
    pub fn with_scheduler(scheduler: Rc<dyn RuntimeScheduler>) -> Self {
        Self::build(Some(scheduler))
    }

    fn build(scheduler: Option<Rc<dyn RuntimeScheduler>>) -> Self {
        Self {
            inner: Rc::new(FrameClockInner {
                callbacks: RefCell::new(VecDeque::new()),
                next_callback_id: Cell::new(1),
                last_frame_nanos: Cell::new(None),
                scheduler,
            }),
        }
    }

    /// Run `callback` after the next completed layout pass.
    ///
    /// Dropping the returned registration before the frame cancels the callback.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = self.inner.register(Box::new(callback));
        FrameCallbackRegistration {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }

    pub fn has_pending_callbacks(&self) -> bool {
        !self.inner.callbacks.borrow().is_empty()
    }

    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.inner.last_frame_nanos.get()
    }

    /// Called by the host once layout for the frame has completed.
    ///
    /// Callbacks registered while draining run on the following frame.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.last_frame_nanos.set(Some(frame_time_nanos));
        let mut callbacks = self.inner.callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        if !pending.is_empty() {
            log::trace!("running {} frame callbacks at {frame_time_nanos}ns", pending.len());
        }
        for callback in pending {
            callback(frame_time_nanos);
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameClock")
            .field("pending", &self.inner.callbacks.borrow().len())
            .field("last_frame_nanos", &self.inner.last_frame_nanos.get())
            .finish()
    }
}

pub struct FrameCallbackRegistration {
    clock: Weak<FrameClockInner>,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    /// True until the callback has run or been cancelled.
    pub fn is_pending(&self) -> bool {
        match (self.id, self.clock.upgrade()) {
            (Some(id), Some(clock)) => clock.is_pending(id),
            _ => false,
        }
    }

    pub fn cancel(mut self) {
        self.cancel_inner();
    }

    /// Let the callback run without keeping the registration around.
    pub fn detach(mut self) {
        self.id.take();
    }

    fn cancel_inner(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(clock) = self.clock.upgrade() {
                clock.cancel(id);
            }
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.cancel_inner();
    }
}

impl fmt::Debug for FrameCallbackRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCallbackRegistration")
            .field("id", &self.id)
            .finish()
    }
}
