//! Per-thread runtime settings

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use zuce_platform::Host;

use crate::throttle::DEFAULT_RESIZE_THROTTLE;

thread_local! {
    static RESIZE_THROTTLE: Cell<Duration> = const { Cell::new(DEFAULT_RESIZE_THROTTLE) };
}

/// Make `host` the current thread's host
///
/// Clears the style cache together with the host's stylesheet and restores
/// default runtime settings, so an app started afterwards sees a fresh
/// stylesheet.
pub fn install(host: Rc<dyn Host>) {
    zuce_platform::install_host(host);
    zuce_style::reset();
    set_resize_throttle(DEFAULT_RESIZE_THROTTLE);
}

/// Interval used to throttle host passes of elements observed from now on
pub fn resize_throttle() -> Duration {
    RESIZE_THROTTLE.with(Cell::get)
}

pub fn set_resize_throttle(interval: Duration) {
    RESIZE_THROTTLE.with(|cell| cell.set(interval));
}
