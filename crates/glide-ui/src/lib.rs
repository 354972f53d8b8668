//! Headless widgets for Glide.
//!
//! Widgets mount elements into a [`Document`](glide_foundation::Document),
//! react to pointer input through the drag engine, and describe their
//! appearance as computed visuals instead of drawing.

pub mod widgets;

pub use widgets::*;

pub mod prelude {
    pub use crate::widgets::{
        Slider, SliderColors, SliderError, SliderProps, SliderRange, SliderStyle, SliderVisuals,
    };
}
