//! Per-thread host context
//!
//! The engine is single-threaded: every element is built, patched and
//! notified on the thread that owns its host. The active host is installed
//! once per UI thread and reached by element constructors without threading a
//! context parameter through every builder call.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::Host;

thread_local! {
    static HOST: RefCell<Option<Rc<dyn Host>>> = const { RefCell::new(None) };
}

/// Install `host` for the current thread, returning the previous one
pub fn install_host(host: Rc<dyn Host>) -> Option<Rc<dyn Host>> {
    tracing::debug!("installing host");
    HOST.with(|slot| slot.borrow_mut().replace(host))
}

/// Remove the current thread's host
pub fn uninstall_host() -> Option<Rc<dyn Host>> {
    HOST.with(|slot| slot.borrow_mut().take())
}

/// Get the current thread's host
///
/// # Panics
///
/// Panics if no host has been installed on this thread.
pub fn current_host() -> Rc<dyn Host> {
    try_current_host().expect("No host installed. Call install_host() before building elements.")
}

/// Get the current thread's host, if one is installed
pub fn try_current_host() -> Option<Rc<dyn Host>> {
    HOST.with(|slot| slot.borrow().clone())
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_install_and_replace() {
        uninstall_host();
        assert!(try_current_host().is_none());

        let first: Rc<dyn Host> = Rc::new(MemoryHost::new());
        assert!(install_host(first.clone()).is_none());
        assert!(Rc::ptr_eq(&current_host(), &first));

        let second: Rc<dyn Host> = Rc::new(MemoryHost::new());
        let previous = install_host(second.clone());
        assert!(previous.is_some_and(|p| Rc::ptr_eq(&p, &first)));

        uninstall_host();
    }
}
