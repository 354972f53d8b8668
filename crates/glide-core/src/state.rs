//! Observable state holders.
//!
//! A [`MutableState`] owns a value and a list of watchers. Writing a value
//! that differs from the current one notifies every watcher synchronously,
//! in the order they were registered. Watchers receive a snapshot of the new
//! value, so they are free to read or write any state (including the one that
//! notified them) while running.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Watcher<T> = Rc<dyn Fn(&T)>;

struct StateInner<T> {
    value: RefCell<T>,
    watchers: RefCell<SmallVec<[(u64, Watcher<T>); 2]>>,
    next_watcher_id: Cell<u64>,
}

impl<T: 'static> StateInner<T> {
    fn add_watcher(&self, watcher: Watcher<T>) -> u64 {
        let id = self.next_watcher_id.get();
        self.next_watcher_id.set(id + 1);
        self.watchers.borrow_mut().push((id, watcher));
        id
    }

    fn remove_watcher(&self, id: u64) {
        self.watchers
            .borrow_mut()
            .retain(|(watcher_id, _)| *watcher_id != id);
    }

    fn notify(&self, snapshot: &T) {
        let watchers: SmallVec<[Watcher<T>; 2]> = self
            .watchers
            .borrow()
            .iter()
            .map(|(_, watcher)| Rc::clone(watcher))
            .collect();
        for watcher in watchers {
            watcher(snapshot);
        }
    }
}

/// Single-threaded observable value.
///
/// Cloning the handle is cheap and every clone observes the same value.
pub struct MutableState<T: 'static> {
    inner: Rc<StateInner<T>>,
}

impl<T: 'static> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(value),
                watchers: RefCell::new(SmallVec::new()),
                next_watcher_id: Cell::new(1),
            }),
        }
    }

    /// Run `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Register `watcher`, invoked after every change with the new value.
    ///
    /// The watcher stays registered until the returned handle is dropped or
    /// cancelled; call [`WatchHandle::detach`] to tie it to the state's lifetime.
    pub fn watch(&self, watcher: impl Fn(&T) + 'static) -> WatchHandle {
        let id = self.inner.add_watcher(Rc::new(watcher));
        let weak: Weak<StateInner<T>> = Rc::downgrade(&self.inner);
        WatchHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_watcher(id);
            }
        })
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.borrow().len()
    }

    /// Read-only view sharing this state's value and watchers.
    pub fn as_state(&self) -> State<T> {
        State {
            inner: self.clone(),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + 'static> MutableState<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: Clone + PartialEq + 'static> MutableState<T> {
    /// Store `value`, notifying watchers only when it differs from the current value.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.notify_current();
    }

    /// Mutate the value in place; watchers run if the result differs from before.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, changed) = {
            let mut current = self.inner.value.borrow_mut();
            let before = current.clone();
            let result = f(&mut current);
            (result, *current != before)
        };
        if changed {
            self.notify_current();
        }
        result
    }

    fn notify_current(&self) {
        let snapshot = self.get();
        self.inner.notify(&snapshot);
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("value", &*self.inner.value.borrow())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

impl<T: Default + 'static> Default for MutableState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Read-only view of a [`MutableState`].
pub struct State<T: 'static> {
    inner: MutableState<T>,
}

impl<T: 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> State<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    pub fn watch(&self, watcher: impl Fn(&T) + 'static) -> WatchHandle {
        self.inner.watch(watcher)
    }
}

impl<T: Clone + 'static> State<T> {
    pub fn get(&self) -> T {
        self.inner.get()
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State")
            .field(&*self.inner.inner.value.borrow())
            .finish()
    }
}

impl<T: 'static> From<MutableState<T>> for State<T> {
    fn from(inner: MutableState<T>) -> Self {
        Self { inner }
    }
}

/// Registration of a watcher; dropping it unregisters the watcher.
pub struct WatchHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl WatchHandle {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the watcher registered for as long as the state itself lives.
    pub fn detach(mut self) {
        self.cancel.take();
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
