//! Robot testing framework for headless interaction tests
//!
//! A [`RobotTestRule`] owns a [`Document`] and a content closure that plays
//! the host's part: it lays out elements (writes their bounds) every frame.
//! The robot then drives pointer and touch input the way a user would,
//! hit testing each event to find its target.
//!
//! # Example
//!
//! ```
//! use glide_testing::RobotTestRule;
//! use glide_ui_graphics::Rect;
//!
//! let mut robot = RobotTestRule::new(|_document| {});
//! let document = robot.document().clone();
//! let page = document.create_element("div");
//! document.set_bounds(page, Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
//!
//! assert_eq!(robot.press_at(10.0, 10.0), Some(page));
//! robot.release();
//! robot.wait_for_idle();
//! ```

use glide_foundation::{Document, ElementId, PointerButton, PointerButtons, PointerEvent, PointerEventKind};
use glide_ui_graphics::Point;

/// Nominal frame length the robot advances per frame (60 Hz).
pub const FRAME_NANOS: u64 = 16_666_667;

const MAX_IDLE_FRAMES: usize = 10;

/// Main robot testing rule: a document, its host layout, and a virtual pointer.
pub struct RobotTestRule {
    document: Document,
    content: Box<dyn FnMut(&Document)>,
    cursor: Point,
    pressed: bool,
    frame_time_nanos: u64,
}

impl RobotTestRule {
    /// Create a rule around a fresh document and run `content` once.
    pub fn new(content: impl FnMut(&Document) + 'static) -> Self {
        Self::with_document(Document::new(), content)
    }

    /// Create a rule around an existing document and run `content` once.
    pub fn with_document(document: Document, content: impl FnMut(&Document) + 'static) -> Self {
        let mut rule = Self {
            document,
            content: Box::new(content),
            cursor: Point::ZERO,
            pressed: false,
            frame_time_nanos: 0,
        };
        rule.layout();
        rule
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    fn layout(&mut self) {
        (self.content)(&self.document);
    }

    /// Run one frame: host layout, then the frame callbacks registered so far.
    pub fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_NANOS;
        self.layout();
        self.document
            .frame_clock()
            .drain_frame_callbacks(self.frame_time_nanos);
    }

    /// Advance frame time by `nanos` and run one frame at that time.
    pub fn advance_time(&mut self, nanos: u64) {
        self.frame_time_nanos += nanos;
        self.layout();
        self.document
            .frame_clock()
            .drain_frame_callbacks(self.frame_time_nanos);
    }

    /// Pump frames until no frame callbacks are pending.
    ///
    /// Always runs at least one frame so layout reflects the latest state.
    pub fn wait_for_idle(&mut self) {
        for _ in 0..MAX_IDLE_FRAMES {
            self.advance_frame();
            if !self.document.frame_clock().has_pending_callbacks() {
                break;
            }
        }
    }

    fn send(&self, event: PointerEvent) {
        self.document.dispatch(&event);
    }

    fn mouse_event(&self, kind: PointerEventKind) -> PointerEvent {
        let mut event = PointerEvent::new(kind, self.cursor);
        event.target = self.document.hit_test(self.cursor);
        if self.pressed {
            event = event.with_buttons(PointerButtons::new().with(PointerButton::Primary));
        }
        event
    }

    /// Move the cursor to the given coordinates and press the primary button.
    ///
    /// Returns the element that was hit, if any.
    pub fn press_at(&mut self, x: f32, y: f32) -> Option<ElementId> {
        self.cursor = Point::new(x, y);
        self.pressed = true;
        let event = self.mouse_event(PointerEventKind::Down);
        let hit = event.target;
        self.send(event);
        hit
    }

    /// Move the cursor; returns the element under it.
    pub fn move_to(&mut self, x: f32, y: f32) -> Option<ElementId> {
        self.cursor = Point::new(x, y);
        let event = self.mouse_event(PointerEventKind::Move);
        let hit = event.target;
        self.send(event);
        hit
    }

    /// Release the primary button at the current cursor position.
    pub fn release(&mut self) {
        self.pressed = false;
        let event = self.mouse_event(PointerEventKind::Up);
        self.send(event);
    }

    /// Press and release at the given coordinates, then wait for idle.
    pub fn click_at(&mut self, x: f32, y: f32) -> Option<ElementId> {
        let hit = self.press_at(x, y);
        self.release();
        self.wait_for_idle();
        hit
    }

    /// Perform a drag from one point to another.
    ///
    /// Presses, lets a frame run, moves in ten steps with a frame after each,
    /// then releases and waits for idle.
    pub fn drag(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32) {
        self.press_at(from_x, from_y);
        self.advance_frame();

        let steps = 10;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let x = from_x + (to_x - from_x) * t;
            let y = from_y + (to_y - from_y) * t;
            self.move_to(x, y);
            self.advance_frame();
        }

        self.release();
        self.wait_for_idle();
    }

    fn touch_event(&self, kind: PointerEventKind, touches: &[Point]) -> PointerEvent {
        let mut event = PointerEvent::touch(kind, touches.iter().copied());
        event.target = touches.first().and_then(|point| self.document.hit_test(*point));
        event
    }

    /// Start a touch with the given active touch points.
    ///
    /// Returns the dispatched event so callers can check `is_default_prevented`.
    pub fn touch_start(&mut self, touches: &[Point]) -> PointerEvent {
        if let Some(first) = touches.first() {
            self.cursor = *first;
        }
        self.pressed = true;
        let event = self.touch_event(PointerEventKind::Down, touches);
        self.send(event.clone());
        event
    }

    pub fn touch_move(&mut self, touches: &[Point]) -> PointerEvent {
        if let Some(first) = touches.first() {
            self.cursor = *first;
        }
        let event = self.touch_event(PointerEventKind::Move, touches);
        self.send(event.clone());
        event
    }

    /// End the touch; the event carries no active touch points.
    pub fn touch_end(&mut self) -> PointerEvent {
        self.pressed = false;
        let event = self.touch_event(PointerEventKind::Up, &[]);
        self.send(event.clone());
        event
    }
}

impl std::fmt::Debug for RobotTestRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobotTestRule")
            .field("document", &self.document)
            .field("cursor", &self.cursor)
            .field("pressed", &self.pressed)
            .field("frame_time_nanos", &self.frame_time_nanos)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_ui_graphics::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn press_targets_the_hit_element() {
        let mut robot = RobotTestRule::new(|_| {});
        let document = robot.document().clone();
        let page = document.create_element("div");
        document
            .set_bounds(page, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let _listener = document.add_element_listener(page, PointerEventKind::Down, {
            let seen = Rc::clone(&seen);
            move |event| seen.borrow_mut().push(event.position)
        });

        assert_eq!(robot.press_at(40.0, 60.0), Some(page));
        assert!(robot.is_pressed());
        assert_eq!(robot.press_at(400.0, 60.0), None);
        robot.release();
        assert!(!robot.is_pressed());
        assert_eq!(*seen.borrow(), vec![Point::new(40.0, 60.0)]);
    }

    #[test]
    fn wait_for_idle_runs_callbacks_scheduled_by_callbacks() {
        let mut robot = RobotTestRule::new(|_| {});
        let clock = robot.document().frame_clock();
        let ran = Rc::new(RefCell::new(Vec::new()));
        let _first = clock.with_frame_nanos({
            let ran = Rc::clone(&ran);
            let clock = clock.clone();
            move |_| {
                ran.borrow_mut().push("first");
                let ran = Rc::clone(&ran);
                clock
                    .with_frame_nanos(move |_| ran.borrow_mut().push("second"))
                    .detach();
            }
        });

        robot.wait_for_idle();
        assert_eq!(*ran.borrow(), vec!["first", "second"]);
        assert!(!clock.has_pending_callbacks());
        assert_eq!(robot.frame_time_nanos(), 2 * FRAME_NANOS);
    }

    #[test]
    fn content_runs_every_frame() {
        let frames = Rc::new(RefCell::new(0));
        let mut robot = RobotTestRule::new({
            let frames = Rc::clone(&frames);
            move |_| *frames.borrow_mut() += 1
        });
        assert_eq!(*frames.borrow(), 1);
        robot.advance_frame();
        robot.advance_time(1_000);
        assert_eq!(*frames.borrow(), 3);
        assert_eq!(robot.frame_time_nanos(), FRAME_NANOS + 1_000);
    }
}
