//! Trailing-edge throttle on the host timer

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use zuce_platform::Host;

/// Default interval for host-pass throttling, about twelve passes a second
pub const DEFAULT_RESIZE_THROTTLE: Duration = Duration::from_millis(83);

struct ThrottleInner {
    host: Weak<dyn Host>,
    interval: Duration,
    scheduled: Cell<bool>,
    action: Box<dyn Fn()>,
}

/// Coalesces bursts of calls into one deferred call
///
/// The first call schedules `action` on the host timer `interval` later;
/// calls made while it is pending are dropped. The action never runs
/// synchronously.
#[derive(Clone)]
pub struct Throttle {
    inner: Rc<ThrottleInner>,
}

impl Throttle {
    /// The host is held weakly so a throttle stored inside host callbacks does
    /// not keep the host alive.
    pub fn new(host: &Rc<dyn Host>, interval: Duration, action: impl Fn() + 'static) -> Self {
        Self {
            inner: Rc::new(ThrottleInner {
                host: Rc::downgrade(host),
                interval,
                scheduled: Cell::new(false),
                action: Box::new(action),
            }),
        }
    }

    pub fn call(&self) {
        if self.inner.scheduled.get() {
            tracing::trace!("throttled call coalesced");
            return;
        }
        let Some(host) = self.inner.host.upgrade() else {
            return;
        };

        self.inner.scheduled.set(true);
        let inner = self.inner.clone();
        host.set_timeout(
            self.inner.interval,
            Box::new(move || {
                inner.scheduled.set(false);
                (inner.action)();
            }),
        );
    }

    /// Whether a call is waiting on the timer
    pub fn is_pending(&self) -> bool {
        self.inner.scheduled.get()
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }
}
