//! zuce Platform Abstraction
//!
//! The capability surface the element engine calls into:
//!
//! - [`Host`]: element, text and fragment creation, attributes, class lists,
//!   event listeners, the shared stylesheet, size observers, and timers
//! - [`context`]: the per-thread host the element builders use
//! - [`memory`] (feature `memory`): an in-memory host for tests and tooling
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use zuce_platform::{install_host, memory::MemoryHost};
//!
//! let host = Rc::new(MemoryHost::new());
//! install_host(host.clone());
//! ```

pub mod context;
pub mod error;
pub mod host;

#[cfg(feature = "memory")]
pub mod memory;

pub use context::{current_host, install_host, try_current_host, uninstall_host};
pub use error::{PlatformError, Result};
pub use host::{Host, HostEvent, HostNodeId, HostSize, Listener, ObserverId, ResizeCallback, Task};
