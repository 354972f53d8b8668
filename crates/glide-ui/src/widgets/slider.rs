//! Slider widget.
//!
//! A controlled numeric input built on [`Draggable`]. The host owns the value:
//! the slider reads it through a [`State`], reports new values through
//! `on_update`, and always places its thumb from whatever the host stored.
//!
//! The slider mounts three elements under the parent it is given:
//!
//! ```text
//! parent
//! └── div.slider-track      laid out by the host
//!     ├── div.slider-fill   laid out by the slider
//!     └── div.slider-thumb  laid out by the slider, drag target
//! ```
//!
//! Pressing the thumb drags it. Pressing anywhere else on the track jumps the
//! value to the press point and, once the next frame has been laid out, keeps
//! the same press going as a thumb drag.

use super::slider_range::{SliderError, SliderRange};
use super::slider_visuals::{SliderColors, SliderStyle, SliderVisuals};
use glide_core::{FrameCallbackRegistration, MutableState, State, WatchHandle};
use glide_foundation::{
    Document, Draggable, DraggableOptions, ElementId, ListenerHandle, PointerEvent,
    PointerEventKind, Position, TreeError,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub const TRACK_CLASS: &str = "slider-track";
pub const FILL_CLASS: &str = "slider-fill";
pub const THUMB_CLASS: &str = "slider-thumb";
/// Set on the track while the slider is disabled.
pub const DISABLED_CLASS: &str = "disabled";
/// Set on the thumb while it is being dragged.
pub const DRAGGING_CLASS: &str = "dragging";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderProps {
    pub min: f64,
    pub max: f64,
    /// Quantisation step counted from `min`; `0` means continuous.
    pub step: f64,
    pub disabled: bool,
    pub style: SliderStyle,
    pub colors: SliderColors,
}

impl SliderProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_style(mut self, style: SliderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_colors(mut self, colors: SliderColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn range(&self) -> Result<SliderRange, SliderError> {
        SliderRange::new(self.min, self.max, self.step)
    }
}

impl Default for SliderProps {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            disabled: false,
            style: SliderStyle::default(),
            colors: SliderColors::default(),
        }
    }
}

/// Elements mounted by a slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliderElements {
    pub track: ElementId,
    pub fill: ElementId,
    pub thumb: ElementId,
}

impl SliderElements {
    fn mount(document: &Document, parent: ElementId) -> Result<Self, TreeError> {
        let elements = document.update_tree(|tree| {
            let track = tree.create_element("div");
            let fill = tree.create_element("div");
            let thumb = tree.create_element("div");
            tree.add_class(track, TRACK_CLASS)?;
            tree.add_class(fill, FILL_CLASS)?;
            tree.add_class(thumb, THUMB_CLASS)?;
            tree.append_child(track, fill)?;
            tree.append_child(track, thumb)?;
            Ok::<_, TreeError>(SliderElements { track, fill, thumb })
        })?;
        if let Err(err) = document.append_child(parent, elements.track) {
            // Don't leave the detached track behind.
            let _ = document.remove_element(elements.track);
            return Err(err);
        }
        Ok(elements)
    }
}

/// Track press waiting for the next frame to continue as a drag.
struct PendingJump {
    _frame: FrameCallbackRegistration,
    _release: ListenerHandle,
}

struct SliderInner {
    document: Document,
    elements: SliderElements,
    range: Cell<SliderRange>,
    disabled: Cell<bool>,
    style: SliderStyle,
    colors: SliderColors,
    model: State<f64>,
    on_update: Box<dyn Fn(f64)>,
    draggable: Draggable,
    last_x: Cell<f64>,
    /// Set while the slider itself moves the engine position.
    syncing: Cell<bool>,
    pending_jump: RefCell<Option<PendingJump>>,
    watches: RefCell<Vec<WatchHandle>>,
    track_listener: RefCell<Option<ListenerHandle>>,
}

impl SliderInner {
    fn emit(&self, value: f64) {
        if self.disabled.get() {
            log::trace!("slider disabled, dropping value {value}");
            return;
        }
        if self.model.get() == value {
            return;
        }
        log::debug!("slider value -> {value}");
        (self.on_update)(value);
    }

    fn on_position(&self, position: &Position) {
        if position.x == self.last_x.get() {
            return;
        }
        self.last_x.set(position.x);
        if self.syncing.get() {
            return;
        }
        let range = self.range.get();
        let model = self.model.get();
        // The model's own percentage always derives the model itself.
        let value = if position.x == range.percent_of(model) && range.snap(model) == model {
            model
        } else {
            range.value_at(position.x)
        };
        self.emit(value);
    }

    /// Moves the engine to `percent` without deriving a value from it.
    fn set_position_quietly(&self, percent: f64) {
        let position = self.draggable.position();
        let y = position.get().y;
        self.syncing.set(true);
        position.set(Position::new(percent, y).clamped());
        self.syncing.set(false);
    }

    fn on_model_changed(&self) {
        if !self.draggable.is_dragging().get() {
            let percent = self.range.get().percent_of(self.model.get());
            self.set_position_quietly(percent);
        }
        self.render();
    }

    fn on_track_press(this: &Rc<Self>, event: &PointerEvent) {
        let SliderElements { track, thumb, .. } = this.elements;
        let Some(origin) = event.target else {
            return;
        };
        // Thumb presses belong to the drag engine.
        if this.document.contains(thumb, origin) || event.is_non_primary_press() {
            return;
        }
        if event.is_touch() {
            event.prevent_default();
        }
        let Some(pointer) = event.client_point() else {
            return;
        };
        let (Some(track_rect), Some(thumb_rect)) =
            (this.document.bounds(track), this.document.bounds(thumb))
        else {
            return;
        };

        let effective = f64::from(track_rect.width) - f64::from(thumb_rect.width);
        let percent = if effective > 0.0 {
            let x = f64::from(pointer.x) - f64::from(track_rect.x) - f64::from(thumb_rect.width) / 2.0;
            x.clamp(0.0, effective) / effective * 100.0
        } else {
            0.0
        };
        log::debug!("track press at {}: jumping to {percent}%", pointer.x);

        this.emit(this.range.get().value_at(percent));
        this.set_position_quietly(percent);
        Self::continue_as_drag(this, event.clone());
    }

    /// Hands `press` to the drag engine once the host has laid out the frame
    /// in which the thumb moved under the pointer.
    fn continue_as_drag(this: &Rc<Self>, press: PointerEvent) {
        let weak = Rc::downgrade(this);
        let frame = this.document.frame_clock().with_frame_nanos({
            let weak = weak.clone();
            move |_| {
                if let Some(inner) = weak.upgrade() {
                    let pending = inner.pending_jump.borrow_mut().take();
                    drop(pending);
                    inner.draggable.on_pointer_down(&press, inner.elements.thumb);
                }
            }
        });
        let release = this
            .document
            .add_document_listener(PointerEventKind::Up, move |_| {
                if let Some(inner) = weak.upgrade() {
                    let pending = inner.pending_jump.borrow_mut().take();
                    if pending.is_some() {
                        log::trace!("track press released before the drag could continue");
                    }
                }
            });
        let previous = this.pending_jump.borrow_mut().replace(PendingJump {
            _frame: frame,
            _release: release,
        });
        drop(previous);
    }

    fn visuals(&self) -> SliderVisuals {
        let track_bounds = self.document.bounds(self.elements.track).unwrap_or_default();
        let percentage = self.range.get().percent_of(self.model.get());
        SliderVisuals::compute(
            track_bounds,
            percentage,
            &self.style,
            self.colors,
            self.disabled.get(),
            self.draggable.is_dragging().get(),
        )
    }

    fn render(&self) -> SliderVisuals {
        let visuals = self.visuals();
        let SliderElements { track, fill, thumb } = self.elements;
        let result = self.document.update_tree(|tree| {
            tree.set_bounds(thumb, visuals.thumb)?;
            tree.set_bounds(fill, visuals.fill)?;
            tree.set_class(track, DISABLED_CLASS, visuals.disabled)?;
            tree.set_class(thumb, DRAGGING_CLASS, visuals.dragging)
        });
        if let Err(err) = result {
            log::warn!("slider render skipped: {err}");
        }
        visuals
    }
}

impl Drop for SliderInner {
    fn drop(&mut self) {
        if self.document.remove_element(self.elements.track).is_err() {
            log::trace!("slider track {} already removed", self.elements.track);
        }
    }
}

/// Handle to a mounted slider. Dropping the last clone unmounts it.
#[derive(Clone)]
pub struct Slider {
    inner: Rc<SliderInner>,
}

impl Slider {
    /// Mounts a slider under `parent`.
    ///
    /// `model` is the authoritative value. `on_update` receives every new
    /// value the user picks; the host is expected to store it in `model`.
    pub fn new(
        document: &Document,
        parent: ElementId,
        props: SliderProps,
        model: State<f64>,
        on_update: impl Fn(f64) + 'static,
    ) -> Result<Self, SliderError> {
        let range = props.range()?;
        let elements = SliderElements::mount(document, parent)?;
        let initial = range.percent_of(model.get());
        let draggable = Draggable::new(
            document,
            DraggableOptions::new(MutableState::new(Some(elements.thumb)))
                .use_offset(true)
                .with_initial_position(Position::new(initial, 0.0)),
        );
        let inner = Rc::new(SliderInner {
            document: document.clone(),
            elements,
            range: Cell::new(range),
            disabled: Cell::new(props.disabled),
            style: props.style,
            colors: props.colors,
            model,
            on_update: Box::new(on_update),
            last_x: Cell::new(draggable.position().get().x),
            draggable,
            syncing: Cell::new(false),
            pending_jump: RefCell::new(None),
            watches: RefCell::new(Vec::new()),
            track_listener: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let position_watch = inner.draggable.position().watch(move |position| {
            if let Some(inner) = weak.upgrade() {
                inner.on_position(position);
            }
        });
        let weak = Rc::downgrade(&inner);
        let dragging_watch = inner.draggable.is_dragging().watch(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
            }
        });
        let weak = Rc::downgrade(&inner);
        let model_watch = inner.model.watch(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_model_changed();
            }
        });
        inner
            .watches
            .borrow_mut()
            .extend([position_watch, dragging_watch, model_watch]);

        let weak = Rc::downgrade(&inner);
        let listener = document.add_element_listener(
            elements.track,
            PointerEventKind::Down,
            move |event| {
                if let Some(inner) = weak.upgrade() {
                    SliderInner::on_track_press(&inner, event);
                }
            },
        );
        *inner.track_listener.borrow_mut() = Some(listener);

        log::debug!(
            "slider mounted under {parent}: [{}, {}] step {}",
            range.min(),
            range.max(),
            range.step()
        );
        inner.render();
        Ok(Self { inner })
    }

    pub fn elements(&self) -> SliderElements {
        self.inner.elements
    }

    pub fn value(&self) -> f64 {
        self.inner.model.get()
    }

    pub fn range(&self) -> SliderRange {
        self.inner.range.get()
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    pub fn is_dragging(&self) -> State<bool> {
        self.inner.draggable.is_dragging()
    }

    pub fn draggable(&self) -> &Draggable {
        &self.inner.draggable
    }

    /// Disabling stops value updates; the thumb can still be dragged.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.disabled.set(disabled);
        self.inner.render();
    }

    pub fn set_range(&self, min: f64, max: f64, step: f64) -> Result<(), SliderError> {
        let range = SliderRange::new(min, max, step)?;
        self.inner.range.set(range);
        self.inner.on_model_changed();
        Ok(())
    }

    /// Current visuals, without touching the element tree.
    pub fn visuals(&self) -> SliderVisuals {
        self.inner.visuals()
    }

    /// Lays out fill and thumb inside the track's current bounds and mirrors
    /// the `disabled`/`dragging` classes. Call after the host lays out the track.
    pub fn render(&self) -> SliderVisuals {
        self.inner.render()
    }
}

impl fmt::Debug for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slider")
            .field("elements", &self.inner.elements)
            .field("range", &self.inner.range.get())
            .field("value", &self.inner.model.get())
            .field("disabled", &self.inner.disabled.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/slider_tests.rs"]
mod tests;
