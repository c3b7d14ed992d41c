//! Minimal publish-on-change containers.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifier returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

/// A list of callbacks notified with events of type `E`.
///
/// Notification works on a snapshot of the list, so callbacks may read the
/// container, mutate it, or (un)subscribe without tripping a borrow.
pub(crate) struct Subscribers<E> {
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(Subscription, Callback<E>)>>,
}

impl<E> Subscribers<E> {
    pub(crate) fn new() -> Self {
        Subscribers {
            next_id: Cell::new(0),
            callbacks: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let id = Subscription(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.callbacks.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub(crate) fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(id, _)| *id != subscription);
        callbacks.len() != before
    }

    pub(crate) fn notify(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .callbacks
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

/// A value plus the callbacks interested in its changes.
///
/// Every `set` notifies subscribers synchronously with the new value, even
/// when it equals the old one.
pub struct Observable<T> {
    value: RefCell<T>,
    subscribers: Subscribers<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            value: RefCell::new(value),
            subscribers: Subscribers::new(),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.subscribers.notify(&value);
    }

    /// Calls `callback` with every future value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    /// Removes a callback. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value.borrow())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_last_set() {
        let observable = Observable::new(1);
        observable.set(2);
        observable.set(3);
        assert_eq!(observable.get(), 3);
    }

    #[test]
    fn test_subscribers_see_every_set() {
        let observable = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        observable.subscribe(move |v| sink.borrow_mut().push(*v));

        observable.set(1);
        observable.set(1);
        observable.set(2);
        assert_eq!(*seen.borrow(), vec![1, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let observable = Observable::new(0);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let subscription = observable.subscribe(move |_| counter.set(counter.get() + 1));

        observable.set(1);
        assert!(observable.unsubscribe(subscription));
        assert!(!observable.unsubscribe(subscription));
        observable.set(2);
        assert_eq!(calls.get(), 1);
        assert_eq!(observable.subscriber_count(), 0);
    }

    #[test]
    fn test_callback_may_read_and_write() {
        let observable = Rc::new(Observable::new(0));
        let inner = observable.clone();
        observable.subscribe(move |v| {
            assert_eq!(inner.get(), *v);
            if *v == 1 {
                inner.set(2);
            }
        });

        observable.set(1);
        assert_eq!(observable.get(), 2);
    }
}
