//! Pointer drag engine.
//!
//! A [`Draggable`] listens for pointer-down on its event-source element. A
//! press outside the ignore region opens a drag session: the parent and target
//! rects are measured once, document-level move/up listeners are registered,
//! and every move stores the target's clamped percentage position and
//! publishes a [`DragNotice`]. Release drops the session, which releases the
//! document listeners it owns.

use super::geometry::{DragGeometry, Position};
use crate::broadcast::DragNotice;
use crate::document::Document;
use crate::element::ElementId;
use crate::input::{ListenerHandle, PointerEvent, PointerEventKind};
use crate::selector::{Selector, SelectorError};
use glide_core::{MutableState, State, WatchHandle};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Reactive element reference. It may be unset, and widgets re-bind when it changes.
pub type ElementRef = MutableState<Option<ElementId>>;

/// Area in which a pointer-down must not start a drag.
#[derive(Clone, Debug, PartialEq)]
pub enum IgnoreRegion {
    /// The press origin or one of its ancestors matches the selector.
    Selector(Selector),
    /// The press origin is this element or lies inside it.
    Element(ElementId),
}

impl IgnoreRegion {
    pub fn selector(source: &str) -> Result<Self, SelectorError> {
        Selector::parse(source).map(IgnoreRegion::Selector)
    }

    pub fn covers(&self, document: &Document, origin: ElementId) -> bool {
        match self {
            IgnoreRegion::Selector(selector) => document.closest(origin, selector).is_some(),
            IgnoreRegion::Element(element) => document.contains(*element, origin),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DraggableOptions {
    pub target: ElementRef,
    /// Element whose pointer-down starts a drag; the target when `None`.
    pub event_target: Option<ElementRef>,
    pub initial_position: Position,
    pub centered: bool,
    pub use_offset: bool,
    pub ignore: Option<IgnoreRegion>,
}

impl DraggableOptions {
    pub fn new(target: ElementRef) -> Self {
        Self {
            target,
            event_target: None,
            initial_position: Position::ZERO,
            centered: false,
            use_offset: false,
            ignore: None,
        }
    }

    pub fn with_event_target(mut self, event_target: ElementRef) -> Self {
        self.event_target = Some(event_target);
        self
    }

    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.initial_position = position;
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    pub fn use_offset(mut self, use_offset: bool) -> Self {
        self.use_offset = use_offset;
        self
    }

    pub fn ignore(mut self, region: IgnoreRegion) -> Self {
        self.ignore = Some(region);
        self
    }
}

struct DragSession {
    element: ElementId,
    geometry: DragGeometry,
    _listeners: [ListenerHandle; 2],
}

struct DraggableInner {
    document: Document,
    options: DraggableOptions,
    position: MutableState<Position>,
    is_dragging: MutableState<bool>,
    session: RefCell<Option<DragSession>>,
    source_listener: RefCell<Option<ListenerHandle>>,
    source_watch: RefCell<Option<WatchHandle>>,
}

impl DraggableInner {
    fn bind_source(this: &Rc<Self>, source: Option<ElementId>) {
        let listener = source.map(|element| {
            let weak = Rc::downgrade(this);
            this.document
                .add_element_listener(element, PointerEventKind::Down, move |event| {
                    if let Some(inner) = weak.upgrade() {
                        if let Some(target) = inner.options.target.get() {
                            Self::start(&inner, event, target);
                        }
                    }
                })
        });
        log::trace!("drag source bound to {source:?}");
        // Replacing the slot drops the previous listener.
        *this.source_listener.borrow_mut() = listener;
    }

    fn start(this: &Rc<Self>, event: &PointerEvent, element: ElementId) {
        if event.is_touch() {
            event.prevent_default();
        }
        if event.is_non_primary_press() {
            log::trace!("ignoring non-primary press on {element}");
            return;
        }
        let Some(pointer) = event.client_point() else {
            return;
        };
        if let (Some(region), Some(origin)) = (&this.options.ignore, event.target) {
            if region.covers(&this.document, origin) {
                log::trace!("press on {origin} is inside the ignore region");
                return;
            }
        }
        let Some(parent) = this.document.parent(element) else {
            return;
        };
        let (Some(parent_rect), Some(target_rect)) =
            (this.document.bounds(parent), this.document.bounds(element))
        else {
            return;
        };

        let geometry = DragGeometry::begin(
            parent_rect,
            target_rect,
            pointer,
            this.options.centered,
            this.options.use_offset,
        )
        .anchored_at(this.position.get());
        let listeners = [
            Self::document_listener(this, PointerEventKind::Move, Self::on_move),
            Self::document_listener(this, PointerEventKind::Up, Self::on_end),
        ];
        log::debug!("drag started on element {element} at ({}, {})", pointer.x, pointer.y);
        // A session already in progress is replaced, releasing its listeners.
        let previous = this.session.borrow_mut().replace(DragSession {
            element,
            geometry,
            _listeners: listeners,
        });
        drop(previous);
        this.is_dragging.set(true);
    }

    fn document_listener(
        this: &Rc<Self>,
        kind: PointerEventKind,
        handler: fn(&Self, &PointerEvent),
    ) -> ListenerHandle {
        let weak: Weak<Self> = Rc::downgrade(this);
        this.document.add_document_listener(kind, move |event| {
            if let Some(inner) = weak.upgrade() {
                handler(&inner, event);
            }
        })
    }

    fn on_move(&self, event: &PointerEvent) {
        if event.is_touch() {
            event.prevent_default();
        }
        let Some(pointer) = event.client_point() else {
            return;
        };
        let Some((element, geometry)) = self
            .session
            .borrow()
            .as_ref()
            .map(|session| (session.element, session.geometry))
        else {
            return;
        };
        let position = geometry.position_for(pointer);
        log::trace!("drag move on {element}: {position:?}");
        self.position.set(position);
        self.document.drag_broadcast().publish(&DragNotice {
            source: element,
            position,
            pointer,
        });
    }

    fn on_end(&self, event: &PointerEvent) {
        if event.is_touch() {
            event.prevent_default();
        }
        let session = self.session.borrow_mut().take();
        if let Some(session) = session {
            log::debug!("drag ended on element {}", session.element);
            self.is_dragging.set(false);
        }
    }
}

/// Drag engine handle. Clones share one engine; dropping the last clone
/// releases every listener and watcher it registered.
#[derive(Clone)]
pub struct Draggable {
    inner: Rc<DraggableInner>,
}

impl Draggable {
    pub fn new(document: &Document, options: DraggableOptions) -> Self {
        let source = options
            .event_target
            .clone()
            .unwrap_or_else(|| options.target.clone());
        let inner = Rc::new(DraggableInner {
            document: document.clone(),
            position: MutableState::new(options.initial_position.clamped()),
            is_dragging: MutableState::new(false),
            options,
            session: RefCell::new(None),
            source_listener: RefCell::new(None),
            source_watch: RefCell::new(None),
        });

        DraggableInner::bind_source(&inner, source.get());
        let weak = Rc::downgrade(&inner);
        let watch = source.watch(move |element| {
            if let Some(inner) = weak.upgrade() {
                DraggableInner::bind_source(&inner, *element);
            }
        });
        *inner.source_watch.borrow_mut() = Some(watch);

        Self { inner }
    }

    /// Current percentage position. Writable so owners can apply optimistic
    /// updates; drag moves overwrite it.
    pub fn position(&self) -> MutableState<Position> {
        self.inner.position.clone()
    }

    pub fn is_dragging(&self) -> State<bool> {
        self.inner.is_dragging.as_state()
    }

    /// Starts a drag of `element` as if `event` had been a press on it.
    ///
    /// Used by composite widgets that want a press elsewhere to continue as a
    /// drag of their own draggable part.
    pub fn on_pointer_down(&self, event: &PointerEvent, element: ElementId) {
        DraggableInner::start(&self.inner, event, element);
    }

    pub fn options(&self) -> &DraggableOptions {
        &self.inner.options
    }

    /// Geometry captured by the active session, if any.
    pub fn session_geometry(&self) -> Option<DragGeometry> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|session| session.geometry)
    }
}

impl fmt::Debug for Draggable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draggable")
            .field("position", &self.inner.position.get())
            .field("is_dragging", &self.inner.is_dragging.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/drag_tests.rs"]
mod tests;
