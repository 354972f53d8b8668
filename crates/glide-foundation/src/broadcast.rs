//! Drag notification bus.
//!
//! Every drag move publishes a [`DragNotice`]. Components that need to react
//! to any drag in the document (not only their own) subscribe here instead of
//! holding a reference to the dragged widget.

use crate::element::ElementId;
use crate::gestures::Position;
use glide_ui_graphics::Point;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragNotice {
    /// Element being dragged.
    pub source: ElementId,
    /// Normalised position after the move.
    pub position: Position,
    /// Pointer location in client coordinates.
    pub pointer: Point,
}

type Subscriber = Rc<dyn Fn(&DragNotice)>;

#[derive(Default)]
struct BroadcastInner {
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_id: Cell<u64>,
}

#[derive(Clone, Default)]
pub struct DragBroadcast {
    inner: Rc<BroadcastInner>,
}

impl DragBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&DragNotice) + 'static) -> Subscription {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn publish(&self, notice: &DragNotice) {
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(notice);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

impl fmt::Debug for DragBroadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragBroadcast")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Active subscription; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    bus: Weak<BroadcastInner>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(id), Some(bus)) = (self.id.take(), self.bus.upgrade()) {
            bus.subscribers
                .borrow_mut()
                .retain(|(subscriber_id, _)| *subscriber_id != id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(x: f64) -> DragNotice {
        DragNotice {
            source: 7,
            position: Position::new(x, 0.0),
            pointer: Point::new(x as f32, 0.0),
        }
    }

    #[test]
    fn publishes_to_every_subscriber_until_dropped() {
        let bus = DragBroadcast::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = bus.subscribe({
            let seen = Rc::clone(&seen);
            move |notice| seen.borrow_mut().push(("first", notice.position.x))
        });
        let _second = bus.subscribe({
            let seen = Rc::clone(&seen);
            move |notice| seen.borrow_mut().push(("second", notice.position.x))
        });

        bus.publish(&notice(10.0));
        first.unsubscribe();
        bus.publish(&notice(20.0));

        assert_eq!(
            *seen.borrow(),
            vec![("first", 10.0), ("second", 10.0), ("second", 20.0)]
        );
        assert_eq!(bus.subscriber_count(), 1);
    }
}
