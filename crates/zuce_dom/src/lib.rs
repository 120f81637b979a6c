//! Zuce element engine
//!
//! Reactive element builders over a pluggable [`Host`](zuce_platform::Host).
//! Each element owns one host node; its styles, attributes, events and
//! children are given as values or as producer closures. A producer that
//! reads the element's state re-runs on every state write, one that reads the
//! host node re-runs (throttled) when the node is resized.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use zuce_dom::prelude::*;
//! use zuce_platform::memory::MemoryHost;
//!
//! fn main() -> zuce_dom::Result<()> {
//!     zuce_dom::install(Rc::new(MemoryHost::new()));
//!
//!     let count = signal(0);
//!     let clicks = count.clone();
//!     let counter = count
//!         .button(("Clicked ", |src: &Source<i32>| *src.state(), " times"))
//!         .events(Events::new().on("click", move |_| clicks.update(|n| n + 1)))
//!         .styles(StyleSet::new().set("padding", 8));
//!
//!     start(move || div((h1(("Counter",)), counter)), StartOptions::default())?;
//!     Ok(())
//! }
//! ```

mod app;
mod content;
mod element;
mod error;
mod props;
mod reconcile;
mod runtime;
mod socket;
mod source;
mod tags;
mod throttle;

pub use app::{start, MountHandle, StartOptions};
pub use content::{AnyElement, Child, Content, IntoChild, IntoChildren, Producer};
pub use element::Element;
pub use error::{Error, Result};
pub use props::{Attributes, Events, IntoProp, Prop};
pub use runtime::{install, resize_throttle, set_resize_throttle};
pub use socket::{Dependency, SocketKey};
pub use source::{HostView, Source};
pub use tags::*;
pub use throttle::{Throttle, DEFAULT_RESIZE_THROTTLE};

// Re-export the reactive and style primitives used in element code
pub use zuce_core::{Signal, Subscription};
pub use zuce_style::{keyframes, StyleSet, StyleValue};

/// Create a signal holding `initial`
pub fn signal<T: Clone + 'static>(initial: T) -> Signal<T> {
    Signal::new(initial)
}

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::{start, MountHandle, StartOptions};
    pub use crate::content::{Child, Content, IntoChild};
    pub use crate::element::Element;
    pub use crate::error::{Error, Result};
    pub use crate::props::{Attributes, Events};
    pub use crate::signal;
    pub use crate::source::Source;
    pub use crate::tags::*;

    pub use zuce_core::Signal;
    pub use zuce_style::StyleSet;
}
