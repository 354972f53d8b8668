//! Drag session geometry: pointer coordinates to clamped percentages.
//!
//! Rects and pointers arrive in `f32` client coordinates; percentages are
//! computed and stored in `f64` so they map to and from `f64` values without
//! picking up single-precision noise.

use glide_ui_graphics::{Point, Rect};

/// Position as a percentage of a reference box, each axis in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both axes clamped into `[0, 100]`; non-finite components become 0.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Measurements captured when a drag starts.
///
/// The rects are read once at pointer-down and stay fixed for the whole
/// session, so moves never re-measure layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGeometry {
    parent: Rect,
    target: Rect,
    grab: Point,
    offset: Point,
    centered: bool,
    use_offset: bool,
    /// Position reported while the pointer sits on its grab point.
    start: Position,
}

impl DragGeometry {
    /// Captures the pointer's offset from the target's top-left corner, or from
    /// its center when `centered` is set.
    pub fn begin(parent: Rect, target: Rect, pointer: Point, centered: bool, use_offset: bool) -> Self {
        let mut offset = pointer - target.origin();
        if centered {
            offset = offset - target.size().half();
        }
        let mut geometry = Self {
            parent,
            target,
            grab: pointer,
            offset,
            centered,
            use_offset,
            start: Position::ZERO,
        };
        geometry.start = geometry.measured(pointer);
        geometry
    }

    /// Uses `current`, the position the target already holds, as the start of
    /// the drag on every axis where the captured layout agrees with it to
    /// within half a pixel. A pointer that returns to its grab point then
    /// reports exactly `current` instead of a value re-derived from rects.
    pub fn anchored_at(mut self, current: Position) -> Self {
        self.start = Position {
            x: self.pick_start(self.start.x, current.x, self.parent.width, self.target.width),
            y: self.pick_start(self.start.y, current.y, self.parent.height, self.target.height),
        };
        self
    }

    pub fn parent(&self) -> Rect {
        self.parent
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn grab(&self) -> Point {
        self.grab
    }

    /// Position the target would take with the pointer at `pointer`.
    pub fn position_for(&self, pointer: Point) -> Position {
        let measured = self.measured(pointer);
        Position {
            x: if pointer.x == self.grab.x { self.start.x } else { measured.x },
            y: if pointer.y == self.grab.y { self.start.y } else { measured.y },
        }
    }

    fn measured(&self, pointer: Point) -> Position {
        let x = self.coordinate(pointer.x, self.grab.x, self.target.x, self.parent.x, self.target.width);
        let y = self.coordinate(pointer.y, self.grab.y, self.target.y, self.parent.y, self.target.height);
        Position {
            x: self.axis_percent(x, self.parent.width, self.target.width),
            y: self.axis_percent(y, self.parent.height, self.target.height),
        }
    }

    /// Target coordinate inside the parent: where it started plus how far the
    /// pointer travelled from the grab point.
    fn coordinate(&self, pointer: f32, grab: f32, target_start: f32, parent_start: f32, size: f32) -> f64 {
        let travelled = f64::from(pointer) - f64::from(grab);
        let mut coordinate = f64::from(target_start) - f64::from(parent_start) + travelled;
        if self.centered {
            coordinate += f64::from(size) / 2.0;
        }
        coordinate
    }

    fn basis(&self, extent: f32, size: f32) -> f64 {
        let (extent, size) = (f64::from(extent), f64::from(size));
        if self.use_offset {
            extent - size
        } else {
            extent
        }
    }

    fn pick_start(&self, measured: f64, current: f64, extent: f32, size: f32) -> f64 {
        let basis = self.basis(extent, size);
        // Half a pixel, as a percentage of the basis.
        let tolerance = 50.0 / basis;
        if basis > 0.0 && current.is_finite() && (current - measured).abs() <= tolerance {
            clamp_percent(current)
        } else {
            measured
        }
    }

    fn axis_percent(&self, coordinate: f64, extent: f32, size: f32) -> f64 {
        let basis = self.basis(extent, size);
        let (extent, size) = (f64::from(extent), f64::from(size));
        let (min, max) = if self.centered {
            (size / 2.0, extent - size / 2.0)
        } else {
            (0.0, extent - size)
        };
        let coordinate = if coordinate.is_finite() { coordinate } else { min };
        // Targets larger than their parent pin to the start of the range.
        let clamped = if max >= min {
            coordinate.clamp(min, max)
        } else {
            min
        };
        if !(basis > 0.0) {
            return 0.0;
        }
        clamp_percent(clamped / basis * 100.0)
    }
}
