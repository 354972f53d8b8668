//! Core runtime pieces shared by every Glide crate.
//!
//! - [`MutableState`] / [`State`]: single-threaded observable values whose
//!   watchers run synchronously, in registration order, on every change.
//! - [`FrameClock`]: one-shot callbacks the host drains once layout for the
//!   current frame has completed.
//! - [`RuntimeScheduler`] / [`Clock`]: platform hooks implemented by
//!   `glide-runtime-std` or an embedding shell.

mod frame_clock;
mod platform;
mod state;

pub use frame_clock::{FrameCallbackId, FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, RuntimeScheduler};
pub use state::{MutableState, State, WatchHandle};

pub mod prelude {
    pub use crate::frame_clock::FrameClock;
    pub use crate::state::{MutableState, State, WatchHandle};
}
