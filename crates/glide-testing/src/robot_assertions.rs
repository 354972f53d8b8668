//! Assertion utilities for robot testing
//!
//! Geometry written by widgets goes through `f32` arithmetic, so positions
//! and sizes are compared with a tolerance.

use glide_foundation::{Document, ElementId};
use glide_ui_graphics::Rect;

/// Assert that a value is within `tolerance` of the expected value.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that a rectangle is approximately equal to another.
pub fn assert_rect_approx_eq(actual: Rect, expected: Rect, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

/// Assert that a rectangle contains a point.
pub fn assert_rect_contains_point(rect: Rect, x: f32, y: f32, msg: &str) {
    assert!(
        rect.contains(x, y),
        "{}: point ({}, {}) not in rect {:?}",
        msg,
        x,
        y,
        rect
    );
}

/// Assert that `element` carries `class` (or doesn't, when `expected` is false).
pub fn assert_has_class(document: &Document, element: ElementId, class: &str, expected: bool) {
    let actual = document.has_class(element, class);
    assert_eq!(
        actual, expected,
        "element {} class '{}': expected present={}, got present={}",
        element, class, expected, actual
    );
}

/// Bounds of `element`, failing the test if it is not in the document.
pub fn bounds_of(document: &Document, element: ElementId) -> Rect {
    match document.bounds(element) {
        Some(bounds) => bounds,
        None => panic!("element {} is not in the document", element),
    }
}
