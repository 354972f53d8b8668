//! Pointer listener registry and event queue.
//!
//! Listeners are registered either on a single element (they receive events
//! bubbling through that element) or on the document (they receive every
//! event of their kind, wherever the pointer is). Each registration returns a
//! [`ListenerHandle`]; dropping the handle removes the listener, so a gesture
//! session that owns its handles can never leak document listeners.

use super::types::{PointerEvent, PointerEventKind};
use crate::element::ElementId;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) type Handler = Rc<dyn Fn(&PointerEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListenerScope {
    Element(ElementId),
    Document,
}

struct ListenerEntry {
    id: u64,
    scope: ListenerScope,
    kind: PointerEventKind,
    handler: Handler,
}

#[derive(Default)]
struct ListenerRegistry {
    entries: RefCell<Vec<ListenerEntry>>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    fn insert(&self, scope: ListenerScope, kind: PointerEventKind, handler: Handler) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.entries.borrow_mut().push(ListenerEntry {
            id,
            scope,
            kind,
            handler,
        });
        id
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|entry| entry.id != id);
    }

    fn is_live(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|entry| entry.id == id)
    }

    fn snapshot(&self, scope: ListenerScope, kind: PointerEventKind) -> Vec<(u64, Handler)> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.scope == scope && entry.kind == kind)
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect()
    }

    fn count(&self, scope: ListenerScope) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.scope == scope)
            .count()
    }
}

pub struct PointerDispatcher {
    registry: Rc<ListenerRegistry>,
    queue: RefCell<VecDeque<PointerEvent>>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(ListenerRegistry::default()),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    fn register(
        &self,
        scope: ListenerScope,
        kind: PointerEventKind,
        handler: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerHandle {
        let id = self.registry.insert(scope, kind, Rc::new(handler));
        ListenerHandle {
            registry: Rc::downgrade(&self.registry),
            id: Some(id),
        }
    }

    pub fn add_element_listener(
        &self,
        element: ElementId,
        kind: PointerEventKind,
        handler: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerHandle {
        self.register(ListenerScope::Element(element), kind, handler)
    }

    pub fn add_document_listener(
        &self,
        kind: PointerEventKind,
        handler: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerHandle {
        self.register(ListenerScope::Document, kind, handler)
    }

    pub fn element_listener_count(&self, element: ElementId) -> usize {
        self.registry.count(ListenerScope::Element(element))
    }

    pub fn document_listener_count(&self) -> usize {
        self.registry.count(ListenerScope::Document)
    }

    /// Invokes the element listeners along `path` (innermost first), then the
    /// document listeners. Listeners removed by an earlier listener in the
    /// same dispatch are skipped.
    pub fn dispatch_along(&self, path: &[ElementId], event: &PointerEvent) {
        for element in path {
            self.invoke(ListenerScope::Element(*element), event);
            if event.is_propagation_stopped() {
                break;
            }
        }
        self.invoke(ListenerScope::Document, event);
    }

    fn invoke(&self, scope: ListenerScope, event: &PointerEvent) {
        for (id, handler) in self.registry.snapshot(scope, event.kind) {
            if self.registry.is_live(id) {
                handler(event);
            }
        }
    }

    pub fn push(&self, event: PointerEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Pops the oldest queued event; events are handed out in arrival order.
    pub fn pop(&self) -> Option<PointerEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Default for PointerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PointerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDispatcher")
            .field("listeners", &self.registry.entries.borrow().len())
            .field("queued", &self.queued())
            .finish()
    }
}

/// Registration of a pointer listener; dropping it removes the listener.
#[must_use = "dropping the handle removes the listener immediately"]
pub struct ListenerHandle {
    registry: Weak<ListenerRegistry>,
    id: Option<u64>,
}

impl ListenerHandle {
    pub fn is_registered(&self) -> bool {
        match (self.id, self.registry.upgrade()) {
            (Some(id), Some(registry)) => registry.is_live(id),
            _ => false,
        }
    }

    pub fn remove(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(registry) = self.registry.upgrade() {
                registry.remove(id);
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}
