//! UI Widget components

pub mod slider;
pub mod slider_range;
pub mod slider_visuals;

pub use slider::*;
pub use slider_range::*;
pub use slider_visuals::*;
