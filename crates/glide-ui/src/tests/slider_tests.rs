use super::*;
use glide_foundation::{PointerButton, PointerButtons, PointerEvent, PointerEventKind};
use glide_ui_graphics::{Point, Rect};
use std::cell::RefCell;

struct Harness {
    document: Document,
    page: ElementId,
    model: MutableState<f64>,
    updates: Rc<RefCell<Vec<f64>>>,
    slider: Slider,
}

/// Mounts a controlled slider whose track the host lays out at `track`.
fn harness(props: SliderProps, track: Rect, initial: f64) -> Harness {
    let document = Document::new();
    let page = document.create_element("main");
    document
        .set_bounds(page, Rect::new(0.0, 0.0, 400.0, 100.0))
        .unwrap();
    let model = MutableState::new(initial);
    let updates = Rc::new(RefCell::new(Vec::new()));
    let slider = Slider::new(&document, page, props, model.as_state(), {
        let model = model.clone();
        let updates = Rc::clone(&updates);
        move |value| {
            updates.borrow_mut().push(value);
            model.set(value);
        }
    })
    .unwrap();
    document.set_bounds(slider.elements().track, track).unwrap();
    slider.render();
    Harness {
        document,
        page,
        model,
        updates,
        slider,
    }
}

fn send(document: &Document, kind: PointerEventKind, x: f32, y: f32) {
    let point = Point::new(x, y);
    let mut event = PointerEvent::new(kind, point);
    event.target = document.hit_test(point);
    document.dispatch(&event);
}

const TRACK_120: Rect = Rect::new(0.0, 0.0, 120.0, 20.0);
const TRACK_200: Rect = Rect::new(0.0, 0.0, 200.0, 20.0);

#[test]
fn mounts_track_fill_and_thumb_under_parent() {
    let h = harness(SliderProps::default(), TRACK_120, 25.0);
    let SliderElements { track, fill, thumb } = h.slider.elements();

    assert_eq!(h.document.parent(track), Some(h.page));
    assert_eq!(h.document.parent(fill), Some(track));
    assert_eq!(h.document.parent(thumb), Some(track));
    assert!(h.document.has_class(track, TRACK_CLASS));
    assert!(h.document.has_class(fill, FILL_CLASS));
    assert!(h.document.has_class(thumb, THUMB_CLASS));

    assert_eq!(h.document.bounds(thumb), Some(Rect::new(25.0, 0.0, 20.0, 20.0)));
    assert_eq!(h.slider.draggable().position().get().x, 25.0);
}

#[test]
fn invalid_range_mounts_nothing() {
    let document = Document::new();
    let page = document.create_element("main");
    let result = Slider::new(
        &document,
        page,
        SliderProps::default().with_range(10.0, 0.0),
        MutableState::new(0.0).as_state(),
        |_| {},
    );

    assert_eq!(
        result.unwrap_err(),
        SliderError::InvertedRange { min: 10.0, max: 0.0 }
    );
    assert!(document.with_tree(|tree| tree.children(page).is_empty()));
}

#[test]
fn missing_parent_is_reported_and_cleaned_up() {
    let document = Document::new();
    let result = Slider::new(
        &document,
        999,
        SliderProps::default(),
        MutableState::new(0.0).as_state(),
        |_| {},
    );

    assert_eq!(
        result.unwrap_err(),
        SliderError::Tree(TreeError::Missing { id: 999 })
    );
    assert!(document.with_tree(|tree| tree.is_empty()));
}

#[test]
fn drag_emits_stepped_values() {
    let h = harness(SliderProps::default().with_step(10.0), TRACK_120, 0.0);

    send(&h.document, PointerEventKind::Down, 10.0, 10.0);
    send(&h.document, PointerEventKind::Move, 54.0, 10.0);
    assert_eq!(*h.updates.borrow(), vec![40.0]);

    send(&h.document, PointerEventKind::Move, 56.0, 10.0);
    assert_eq!(*h.updates.borrow(), vec![40.0, 50.0]);

    // Same quantised value: nothing new to report.
    send(&h.document, PointerEventKind::Move, 57.0, 10.0);
    assert_eq!(*h.updates.borrow(), vec![40.0, 50.0]);
    send(&h.document, PointerEventKind::Up, 57.0, 10.0);

    assert_eq!(h.model.get(), 50.0);
    assert_eq!(
        h.document.bounds(h.slider.elements().thumb),
        Some(Rect::new(50.0, 0.0, 20.0, 20.0))
    );
}

#[test]
fn disabled_slider_moves_engine_but_never_emits() {
    let h = harness(SliderProps::default().disabled(true), TRACK_120, 0.0);
    assert!(h.document.has_class(h.slider.elements().track, DISABLED_CLASS));

    send(&h.document, PointerEventKind::Down, 10.0, 10.0);
    send(&h.document, PointerEventKind::Move, 60.0, 10.0);
    send(&h.document, PointerEventKind::Up, 60.0, 10.0);

    assert_eq!(h.slider.draggable().position().get().x, 50.0);
    assert!(h.updates.borrow().is_empty());
    assert_eq!(h.model.get(), 0.0);

    h.slider.set_disabled(false);
    assert!(!h.document.has_class(h.slider.elements().track, DISABLED_CLASS));
    assert!(!h.slider.visuals().disabled);
}

#[test]
fn dragging_class_follows_the_session() {
    let h = harness(SliderProps::default(), TRACK_120, 0.0);
    let thumb = h.slider.elements().thumb;

    send(&h.document, PointerEventKind::Down, 10.0, 10.0);
    assert!(h.document.has_class(thumb, DRAGGING_CLASS));
    assert!(h.slider.is_dragging().get());
    assert_eq!(h.slider.visuals().thumb_layer.scale, 1.25);

    send(&h.document, PointerEventKind::Up, 10.0, 10.0);
    assert!(!h.document.has_class(thumb, DRAGGING_CLASS));
}

#[test]
fn external_model_changes_reposition_thumb() {
    let h = harness(SliderProps::default(), TRACK_120, 0.0);
    h.model.set(75.0);

    assert_eq!(
        h.document.bounds(h.slider.elements().thumb),
        Some(Rect::new(75.0, 0.0, 20.0, 20.0))
    );
    assert_eq!(h.slider.draggable().position().get().x, 75.0);
    assert!(h.updates.borrow().is_empty());
}

#[test]
fn track_press_jumps_then_continues_as_drag() {
    let h = harness(SliderProps::default(), TRACK_200, 0.0);
    let clock = h.document.frame_clock();

    send(&h.document, PointerEventKind::Down, 100.0, 10.0);
    assert_eq!(*h.updates.borrow(), vec![50.0]);
    assert_eq!(h.slider.draggable().position().get().x, 50.0);
    assert!(!h.slider.is_dragging().get());
    assert!(clock.has_pending_callbacks());

    clock.drain_frame_callbacks(16_000_000);
    assert!(h.slider.is_dragging().get());

    send(&h.document, PointerEventKind::Move, 145.0, 10.0);
    assert_eq!(*h.updates.borrow(), vec![50.0, 75.0]);
    send(&h.document, PointerEventKind::Up, 145.0, 10.0);
    assert!(!h.slider.is_dragging().get());
}

#[test]
fn continuous_drag_back_to_grab_point_restores_model() {
    let props = SliderProps::default().with_range(0.0, 3.0).with_step(0.0);
    let h = harness(props, TRACK_200, 1.0);
    assert_eq!(
        h.document.bounds(h.slider.elements().thumb),
        Some(Rect::new(60.0, 0.0, 20.0, 20.0))
    );

    send(&h.document, PointerEventKind::Down, 70.0, 10.0);
    send(&h.document, PointerEventKind::Move, 70.5, 10.0);
    assert_ne!(h.model.get(), 1.0);
    send(&h.document, PointerEventKind::Move, 70.0, 10.0);
    send(&h.document, PointerEventKind::Up, 70.0, 10.0);

    assert_eq!(h.updates.borrow().len(), 2);
    assert_eq!(h.updates.borrow().last(), Some(&1.0));
    assert_eq!(h.model.get(), 1.0);
}

#[test]
fn press_and_release_on_thumb_emits_nothing() {
    let props = SliderProps::default().with_range(0.0, 3.0).with_step(0.0);
    let h = harness(props, TRACK_200, 1.0);

    send(&h.document, PointerEventKind::Down, 70.0, 10.0);
    send(&h.document, PointerEventKind::Move, 70.0, 10.0);
    send(&h.document, PointerEventKind::Up, 70.0, 10.0);

    assert!(h.updates.borrow().is_empty());
    assert_eq!(h.model.get(), 1.0);
}

#[test]
fn secondary_button_track_press_is_ignored() {
    let h = harness(SliderProps::default(), TRACK_200, 0.0);
    let point = Point::new(150.0, 10.0);
    let mut event = PointerEvent::new(PointerEventKind::Down, point)
        .with_buttons(PointerButtons::new().with(PointerButton::Secondary));
    event.target = h.document.hit_test(point);
    h.document.dispatch(&event);

    assert!(h.updates.borrow().is_empty());
    assert!(!h.slider.is_dragging().get());
    assert!(!h.document.frame_clock().has_pending_callbacks());
}

#[test]
fn release_before_next_frame_cancels_continuation() {
    let h = harness(SliderProps::default(), TRACK_200, 0.0);
    let clock = h.document.frame_clock();

    send(&h.document, PointerEventKind::Down, 100.0, 10.0);
    send(&h.document, PointerEventKind::Up, 100.0, 10.0);
    assert!(!clock.has_pending_callbacks());
    assert_eq!(h.document.document_listener_count(), 0);

    clock.drain_frame_callbacks(16_000_000);
    assert!(!h.slider.is_dragging().get());
}

#[test]
fn thumb_press_does_not_jump() {
    let h = harness(SliderProps::default(), TRACK_200, 0.0);

    send(&h.document, PointerEventKind::Down, 18.0, 10.0);
    assert!(h.updates.borrow().is_empty());
    assert!(h.slider.is_dragging().get());
    assert!(!h.document.frame_clock().has_pending_callbacks());
}

#[test]
fn set_range_revalidates_and_rerenders() {
    let h = harness(SliderProps::default(), TRACK_120, 25.0);

    h.slider.set_range(0.0, 50.0, 5.0).unwrap();
    assert_eq!(h.slider.range().max(), 50.0);
    assert_eq!(
        h.document.bounds(h.slider.elements().thumb),
        Some(Rect::new(50.0, 0.0, 20.0, 20.0))
    );

    let err = h.slider.set_range(1.0, 0.0, 1.0).unwrap_err();
    assert_eq!(err, SliderError::InvertedRange { min: 1.0, max: 0.0 });
    assert_eq!(h.slider.range().max(), 50.0);
}

#[test]
fn degenerate_range_renders_at_start_and_emits_nothing() {
    let h = harness(SliderProps::default().with_range(5.0, 5.0), TRACK_120, 5.0);
    assert_eq!(h.slider.visuals().percentage, 0.0);

    send(&h.document, PointerEventKind::Down, 10.0, 10.0);
    send(&h.document, PointerEventKind::Move, 110.0, 10.0);
    send(&h.document, PointerEventKind::Up, 110.0, 10.0);
    assert!(h.updates.borrow().is_empty());
}

#[test]
fn dropping_slider_unmounts_it() {
    let h = harness(SliderProps::default(), TRACK_120, 0.0);
    let SliderElements { track, thumb, .. } = h.slider.elements();
    let Harness {
        document,
        page,
        model,
        slider,
        ..
    } = h;

    drop(slider);
    assert!(document.with_tree(|tree| tree.children(page).is_empty()));
    assert_eq!(document.element_listener_count(track), 0);
    assert_eq!(document.element_listener_count(thumb), 0);
    assert_eq!(model.watcher_count(), 0);
}
