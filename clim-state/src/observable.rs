//! Minimal single-threaded pub/sub.
//!
//! Subscribers are snapshotted before each emit, so a callback may freely
//! subscribe, unsubscribe or set other observables while being notified.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SubscriptionId = usize;

type Callback<T> = Rc<dyn Fn(&T)>;

/// A list of callbacks fired with a value.
pub struct Emitter<T> {
    next_id: Cell<SubscriptionId>,
    subscribers: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in snapshot {
            cb(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// A value that notifies its subscribers when it changes.
pub struct Observable<T> {
    value: RefCell<T>,
    changed: Emitter<T>,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            changed: Emitter::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value` and notify subscribers. Equal values are ignored.
    pub fn set(&self, value: T) -> bool {
        if !self.replace(value) {
            return false;
        }
        self.notify();
        true
    }

    /// Store `value` without notifying. Returns whether it changed.
    pub fn replace(&self, value: T) -> bool {
        let mut current = self.value.borrow_mut();
        if *current == value {
            return false;
        }
        *current = value;
        true
    }

    /// Fire subscribers with the current value.
    pub fn notify(&self) {
        let value = self.get();
        self.changed.emit(&value);
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }
}
