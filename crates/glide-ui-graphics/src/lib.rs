//! Pure math/data for Glide widgets
//!
//! This crate contains the geometry primitives and color definitions that
//! element bounds, drag sessions and slider visuals are expressed in.

mod color;
mod geometry;

pub use color::*;
pub use geometry::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{
        CornerRadii, DrawPrimitive, GraphicsLayer, Point, Rect, RoundedCornerShape, Size,
    };
}
