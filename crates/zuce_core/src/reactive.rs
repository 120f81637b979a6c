//! Signals and subscriptions
//!
//! A [`Signal`] is a single mutable value cell with an ordered list of
//! subscribers. Every write synchronously fans out to all subscribers, in
//! subscription order, before the write returns:
//!
//! ```rust
//! use zuce_core::reactive::Signal;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(0);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let log = seen.clone();
//! let _subscription = count.subscribe(move |value| log.borrow_mut().push(*value));
//!
//! count.set(1);
//! count.update(|prev| prev + 1);
//!
//! assert_eq!(*seen.borrow(), vec![0, 1, 2]);
//! ```
//!
//! There is no equality short-circuit and no batching: writing the same value
//! twice notifies twice. Subscriptions are not released automatically; they
//! live as long as the signal unless explicitly cancelled.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// Identifier of a subscription, unique within its signal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Effect<T> = Rc<dyn Fn(&T)>;

/// Ordered subscriber list. Replaced wholesale on every change so that a
/// fan-out in progress keeps iterating its own snapshot.
type Subscribers<T> = Rc<SmallVec<[(SubscriptionId, Effect<T>); 4]>>;

struct SignalInner<T> {
    current: RefCell<T>,
    subscribers: RefCell<Subscribers<T>>,
    next_id: Cell<u64>,
}

impl<T> SignalInner<T> {
    fn remove(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        if !subscribers.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        let remaining = subscribers
            .iter()
            .filter(|(existing, _)| *existing != id)
            .cloned()
            .collect();
        *subscribers = Rc::new(remaining);
        true
    }
}

/// A mutable value cell with synchronous subscriber notification
///
/// Cloning a `Signal` clones the handle; all clones share the same value and
/// subscriber list.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("current", &*self.inner.current.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a signal holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                current: RefCell::new(initial),
                subscribers: RefCell::new(Rc::new(SmallVec::new())),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.inner.current.borrow().clone()
    }

    /// Read the current value without cloning it
    ///
    /// The value is borrowed for the duration of `f`; writing to this signal
    /// from inside `f` panics.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.current.borrow())
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, value: T) {
        *self.inner.current.borrow_mut() = value;
        self.notify();
    }

    /// Derive the next value from the current one and notify every subscriber
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.get());
        self.set(next);
    }

    /// Register `effect`, invoking it once with the current value first
    pub fn subscribe(&self, effect: impl Fn(&T) + 'static) -> Subscription<T> {
        let effect: Effect<T> = Rc::new(effect);
        effect(&self.get());

        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let mut subscribers = self.inner.subscribers.borrow_mut();
        let mut next = (**subscribers).clone();
        next.push((id, effect));
        *subscribers = Rc::new(next);

        tracing::trace!(?id, total = subscribers.len(), "signal subscribed");

        Subscription {
            id,
            source: Rc::downgrade(&self.inner),
        }
    }

    /// Remove a subscription; no-op if it was already removed
    pub fn unsubscribe(&self, subscription: &Subscription<T>) {
        if self.inner.remove(subscription.id) {
            tracing::trace!(id = ?subscription.id, "signal unsubscribed");
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether two handles point at the same signal
    pub fn ptr_eq(&self, other: &Signal<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        let snapshot = self.inner.subscribers.borrow().clone();
        for (_, effect) in snapshot.iter() {
            // Each subscriber sees the value current at its turn, which a
            // nested write from an earlier subscriber may have changed.
            let value = self.get();
            effect(&value);
        }
    }
}

/// Cancellable binding between a [`Signal`] and one effect
///
/// Dropping a `Subscription` does not cancel it; call
/// [`Subscription::unsubscribe`] or [`Signal::unsubscribe`].
pub struct Subscription<T> {
    id: SubscriptionId,
    source: Weak<SignalInner<T>>,
}

impl<T> Subscription<T> {
    /// The subscription's id within its signal
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove this subscription from its signal; no-op if already removed
    pub fn unsubscribe(&self) {
        if let Some(source) = self.source.upgrade() {
            source.remove(self.id);
        }
    }

    /// Whether the subscription is still registered with a live signal
    pub fn is_active(&self) -> bool {
        self.source.upgrade().is_some_and(|source| {
            source
                .subscribers
                .borrow()
                .iter()
                .any(|(id, _)| *id == self.id)
        })
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(T)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |value| sink.borrow_mut().push(value))
    }

    #[test]
    fn test_subscribe_fires_immediately_with_current_value() {
        let signal = Signal::new(1);
        signal.set(7);

        let (log, push) = recorder();
        let _sub = signal.subscribe(move |v| push(*v));

        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn test_notification_order_matches_subscription_order() {
        let signal = Signal::new(0);
        let (log, push) = recorder::<(usize, i32)>();
        let push = Rc::new(push);

        for index in 0..4 {
            let push = push.clone();
            signal.subscribe(move |v| push((index, *v)));
        }
        log.borrow_mut().clear();

        signal.set(5);

        assert_eq!(*log.borrow(), vec![(0, 5), (1, 5), (2, 5), (3, 5)]);
    }

    #[test]
    fn test_equal_writes_still_notify() {
        let signal = Signal::new("same".to_string());
        let (log, push) = recorder();
        let _sub = signal.subscribe(move |v: &String| push(v.clone()));

        signal.set("same".to_string());
        signal.set("same".to_string());

        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_update_applies_to_current_value() {
        let signal = Signal::new(10);
        signal.update(|prev| prev * 2);
        signal.update(|prev| prev + 1);
        assert_eq!(signal.get(), 21);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let signal = Signal::new(0);
        let (log, push) = recorder();
        let sub = signal.subscribe(move |v| push(*v));

        signal.set(1);
        signal.unsubscribe(&sub);
        signal.set(2);
        sub.unsubscribe();

        assert_eq!(*log.borrow(), vec![0, 1]);
        assert_eq!(signal.subscriber_count(), 0);
        assert!(!sub.is_active());
    }

    #[test]
    fn test_subscriber_added_during_notification_is_not_notified() {
        let signal = Signal::new(0);
        let (log, push) = recorder::<&'static str>();
        let push = Rc::new(push);

        let added = Rc::new(Cell::new(false));
        let outer_signal = signal.clone();
        let outer_push = push.clone();
        let outer_added = added.clone();
        signal.subscribe(move |v| {
            if *v == 1 && !outer_added.get() {
                outer_added.set(true);
                let late_push = outer_push.clone();
                outer_signal.subscribe(move |_| late_push("late"));
            }
        });
        log.borrow_mut().clear();

        signal.set(1);
        // The late subscriber fires once at subscribe time, never as part of
        // the write that added it.
        assert_eq!(*log.borrow(), vec!["late"]);

        signal.set(2);
        assert_eq!(*log.borrow(), vec!["late", "late"]);
    }

    #[test]
    fn test_reentrant_write_completes_before_outer_fan_out() {
        let signal = Signal::new(0);
        let (log, push) = recorder::<(char, i32)>();
        let push = Rc::new(push);

        let writer = signal.clone();
        let first = push.clone();
        signal.subscribe(move |v| {
            first(('a', *v));
            if *v == 1 {
                writer.set(2);
            }
        });
        let second = push.clone();
        signal.subscribe(move |v| second(('b', *v)));
        log.borrow_mut().clear();

        signal.set(1);

        assert_eq!(
            *log.borrow(),
            vec![('a', 1), ('a', 2), ('b', 2), ('b', 2)]
        );
    }

    #[test]
    fn test_clones_share_state() {
        let signal = Signal::new(false);
        let other = signal.clone();
        other.set(true);
        assert!(signal.get());
        assert!(signal.ptr_eq(&other));
        assert!(!signal.ptr_eq(&Signal::new(true)));
    }
}
