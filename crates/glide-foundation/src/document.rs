//! Host-facing document handle.
//!
//! A [`Document`] bundles the element tree, the pointer dispatcher, the drag
//! broadcast bus and the frame clock. The host writes layout into the tree,
//! feeds pointer events in, and drains the frame clock after each layout pass.
//! Widgets keep a clone of the handle; listeners they register only hold weak
//! references back to the widget, so no reference cycles form.

use crate::broadcast::DragBroadcast;
use crate::element::{ElementId, ElementTree, TreeError};
use crate::input::{ListenerHandle, PointerDispatcher, PointerEvent, PointerEventKind};
use crate::selector::Selector;
use glide_core::FrameClock;
use glide_ui_graphics::{Point, Rect};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct DocumentInner {
    tree: RefCell<ElementTree>,
    dispatcher: PointerDispatcher,
    broadcast: DragBroadcast,
    frame_clock: FrameClock,
}

#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        Self::with_frame_clock(FrameClock::new())
    }

    pub fn with_frame_clock(frame_clock: FrameClock) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                tree: RefCell::new(ElementTree::new()),
                dispatcher: PointerDispatcher::new(),
                broadcast: DragBroadcast::new(),
                frame_clock,
            }),
        }
    }

    /// Run `f` with read access to the element tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ElementTree) -> R) -> R {
        f(&self.inner.tree.borrow())
    }

    /// Run `f` with write access to the element tree.
    pub fn update_tree<R>(&self, f: impl FnOnce(&mut ElementTree) -> R) -> R {
        f(&mut self.inner.tree.borrow_mut())
    }

    pub fn create_element(&self, tag: &str) -> ElementId {
        self.update_tree(|tree| tree.create_element(tag))
    }

    pub fn append_child(&self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        self.update_tree(|tree| tree.append_child(parent, child))
    }

    pub fn remove_element(&self, id: ElementId) -> Result<(), TreeError> {
        self.update_tree(|tree| tree.remove(id))
    }

    pub fn set_bounds(&self, id: ElementId, bounds: Rect) -> Result<(), TreeError> {
        self.update_tree(|tree| tree.set_bounds(id, bounds))
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.with_tree(|tree| tree.bounds(id))
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.with_tree(|tree| tree.parent(id))
    }

    pub fn add_class(&self, id: ElementId, class: &str) -> Result<(), TreeError> {
        self.update_tree(|tree| tree.add_class(id, class))
    }

    pub fn set_class(&self, id: ElementId, class: &str, enabled: bool) -> Result<(), TreeError> {
        self.update_tree(|tree| tree.set_class(id, class, enabled))
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.with_tree(|tree| tree.has_class(id, class))
    }

    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.with_tree(|tree| tree.contains(ancestor, node))
    }

    pub fn closest(&self, id: ElementId, selector: &Selector) -> Option<ElementId> {
        self.with_tree(|tree| tree.closest(id, selector))
    }

    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.with_tree(|tree| tree.hit_test(point))
    }

    pub fn add_element_listener(
        &self,
        element: ElementId,
        kind: PointerEventKind,
        handler: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerHandle {
        self.inner
            .dispatcher
            .add_element_listener(element, kind, handler)
    }

    pub fn add_document_listener(
        &self,
        kind: PointerEventKind,
        handler: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerHandle {
        self.inner.dispatcher.add_document_listener(kind, handler)
    }

    pub fn element_listener_count(&self, element: ElementId) -> usize {
        self.inner.dispatcher.element_listener_count(element)
    }

    pub fn document_listener_count(&self) -> usize {
        self.inner.dispatcher.document_listener_count()
    }

    /// Deliver `event` synchronously: element listeners from the event's
    /// target outwards, then document listeners.
    pub fn dispatch(&self, event: &PointerEvent) {
        let path: SmallVec<[ElementId; 8]> = match event.target {
            Some(target) => self.with_tree(|tree| tree.ancestors(target).collect()),
            None => SmallVec::new(),
        };
        self.inner.dispatcher.dispatch_along(&path, event);
    }

    /// Queue `event` for the next [`flush_pointer_events`](Self::flush_pointer_events).
    pub fn enqueue(&self, event: PointerEvent) {
        self.inner.dispatcher.push(event);
    }

    /// Dispatch every queued event in arrival order; returns how many ran.
    pub fn flush_pointer_events(&self) -> usize {
        let mut count = 0;
        while let Some(event) = self.inner.dispatcher.pop() {
            self.dispatch(&event);
            count += 1;
        }
        count
    }

    pub fn drag_broadcast(&self) -> DragBroadcast {
        self.inner.broadcast.clone()
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.inner.frame_clock.clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.inner.tree.borrow().len())
            .field("dispatcher", &self.inner.dispatcher)
            .field("frame_clock", &self.inner.frame_clock)
            .finish()
    }
}
