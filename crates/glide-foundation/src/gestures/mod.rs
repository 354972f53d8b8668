pub mod drag;
pub mod geometry;

pub use drag::{Draggable, DraggableOptions, ElementRef, IgnoreRegion};
pub use geometry::{DragGeometry, Position};
