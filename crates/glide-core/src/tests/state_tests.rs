use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn set_notifies_watchers_in_registration_order() {
    let state = MutableState::new(0);
    let log = Rc::new(RefCell::new(Vec::new()));

    let first = state.watch({
        let log = Rc::clone(&log);
        move |value| log.borrow_mut().push(("first", *value))
    });
    let second = state.watch({
        let log = Rc::clone(&log);
        move |value| log.borrow_mut().push(("second", *value))
    });

    state.set(5);

    assert_eq!(*log.borrow(), vec![("first", 5), ("second", 5)]);
    drop((first, second));
}

#[test]
fn setting_equal_value_does_not_notify() {
    let state = MutableState::new(3);
    let calls = Rc::new(RefCell::new(0));
    let _handle = state.watch({
        let calls = Rc::clone(&calls);
        move |_| *calls.borrow_mut() += 1
    });

    state.set(3);
    state.update(|value| *value = 3);
    assert_eq!(*calls.borrow(), 0);

    state.update(|value| *value += 1);
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(state.get(), 4);
}

#[test]
fn dropping_handle_unregisters_watcher() {
    let state = MutableState::new(0);
    let calls = Rc::new(RefCell::new(0));
    let handle = state.watch({
        let calls = Rc::clone(&calls);
        move |_| *calls.borrow_mut() += 1
    });
    assert_eq!(state.watcher_count(), 1);

    drop(handle);
    state.set(1);

    assert_eq!(state.watcher_count(), 0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn detached_watcher_outlives_handle() {
    let state = MutableState::new(0);
    let seen = Rc::new(RefCell::new(None));
    state
        .watch({
            let seen = Rc::clone(&seen);
            move |value| *seen.borrow_mut() = Some(*value)
        })
        .detach();

    state.set(9);
    assert_eq!(*seen.borrow(), Some(9));
}

#[test]
fn watcher_may_write_state_reentrantly() {
    let source = MutableState::new(0);
    let mirror = MutableState::new(0);
    let _handle = source.watch({
        let source = source.clone();
        let mirror = mirror.clone();
        move |value| {
            mirror.set(*value * 2);
            // Reading the notifying state inside its own watcher must not panic.
            assert_eq!(source.get(), *value);
        }
    });

    source.set(21);
    assert_eq!(mirror.get(), 42);
}

#[test]
fn read_only_view_shares_value() {
    let state = MutableState::new(String::from("a"));
    let view = state.as_state();
    state.set(String::from("b"));
    assert_eq!(view.get(), "b");
    assert_eq!(view.with(|value| value.len()), 1);
}
