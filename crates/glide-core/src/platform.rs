//! Hooks a host implements so the runtime can ask for frames and read time.

/// Receives frame requests from the [`FrameClock`](crate::FrameClock).
///
/// The host answers a request by laying out and then draining the clock.
pub trait RuntimeScheduler {
    fn schedule_frame(&self);
}

/// Monotonic time source used to stamp frames.
pub trait Clock {
    type Instant: Copy;

    fn now(&self) -> Self::Instant;

    /// Nanoseconds elapsed since `since`.
    fn elapsed_nanos(&self, since: Self::Instant) -> u64;
}
