use crate::element::ElementId;
use glide_ui_graphics::Point;
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
}

/// Device that produced the event. Touch events carry their active touch
/// points instead of a single cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer or touch event in client coordinates.
///
/// Clones share the default-prevented and propagation flags, so a listener
/// deep in the dispatch path can mark the original event.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub source: PointerSource,
    /// Cursor position; for touch events, the first active touch point (or zero).
    pub position: Point,
    /// Active touch points, empty for mouse events.
    pub touches: SmallVec<[Point; 2]>,
    /// Element the pointer landed on, as determined by the host's hit test.
    pub target: Option<ElementId>,
    pub buttons: PointerButtons,
    default_prevented: Rc<Cell<bool>>,
    propagation_stopped: Rc<Cell<bool>>,
}

impl PointerEvent {
    /// Mouse event at `position`.
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            source: PointerSource::Mouse,
            position,
            touches: SmallVec::new(),
            target: None,
            buttons: PointerButtons::NONE,
            default_prevented: Rc::new(Cell::new(false)),
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    /// Touch event carrying the currently active touch points.
    pub fn touch(kind: PointerEventKind, touches: impl IntoIterator<Item = Point>) -> Self {
        let touches: SmallVec<[Point; 2]> = touches.into_iter().collect();
        let position = touches.first().copied().unwrap_or(Point::ZERO);
        Self {
            source: PointerSource::Touch,
            touches,
            ..Self::new(kind, position)
        }
    }

    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the buttons state for this event
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn is_touch(&self) -> bool {
        self.source == PointerSource::Touch
    }

    /// A mouse press made only with non-primary buttons, such as a context
    /// menu click. Events that carry no button state count as primary.
    pub fn is_non_primary_press(&self) -> bool {
        self.source == PointerSource::Mouse
            && self.buttons != PointerButtons::NONE
            && !self.buttons.contains(PointerButton::Primary)
    }

    /// Point that drives gestures: the cursor for mouse events, the first
    /// active touch for touch events, `None` for a touch event without touches.
    pub fn client_point(&self) -> Option<Point> {
        match self.source {
            PointerSource::Mouse => Some(self.position),
            PointerSource::Touch => self.touches.first().copied(),
        }
    }

    /// Ask the host to skip its default handling (scrolling, zoom gestures).
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop bubbling to ancestor element listeners; document listeners still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}
