//! The host capability surface
//!
//! The element engine never touches a rendering environment directly. It
//! calls into a [`Host`], which owns the real visual elements and hands out
//! opaque [`HostNodeId`] handles for them. A browser binding maps the ids to
//! DOM nodes; the in-memory host (feature `memory`) keeps a plain tree.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use slotmap::new_key_type;

use crate::error::Result;

new_key_type! {
    /// Handle to an element, text node, or fragment owned by the host
    pub struct HostNodeId;
    /// Handle to an attached size-change observer
    pub struct ObserverId;
}

/// An event delivered to a listener
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostEvent {
    /// Event name, e.g. `click`
    pub name: String,
    /// The node the listener is bound to
    pub target: HostNodeId,
}

/// Measured size of a host node, in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostSize {
    pub width: f32,
    pub height: f32,
}

impl HostSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Event listener
///
/// Listener identity is the identity of the `Rc`: removing a listener
/// removes the binding made with the same allocation.
pub type Listener = Rc<dyn Fn(&HostEvent)>;

/// Size-change callback registered with [`Host::observe_resize`]
pub type ResizeCallback = Rc<dyn Fn()>;

/// Deferred task for [`Host::set_timeout`]
pub type Task = Box<dyn FnOnce()>;

/// Capabilities the element engine needs from a rendering environment
///
/// All methods take `&self`; implementations use interior mutability and must
/// not hold internal borrows while invoking listeners, observers, or tasks,
/// since those call back into the engine.
pub trait Host {
    // =========================================================================
    // Tree
    // =========================================================================

    /// Create a detached element with the given tag name
    fn create_element(&self, tag: &str) -> HostNodeId;

    /// Create a detached text node
    fn create_text(&self, text: &str) -> HostNodeId;

    /// Create an empty detached fragment
    ///
    /// Appending a fragment moves its children into the target and leaves the
    /// fragment empty.
    fn create_fragment(&self) -> HostNodeId;

    /// The child at `index`, if any
    fn child_at(&self, parent: HostNodeId, index: usize) -> Option<HostNodeId>;

    /// Append `child` (or a fragment's children) to `parent`, moving it from
    /// any previous parent
    fn append(&self, parent: HostNodeId, child: HostNodeId);

    /// Put `replacement` (or a fragment's children) where `node` is; no-op
    /// when `node` has no parent
    fn replace_with(&self, node: HostNodeId, replacement: HostNodeId);

    /// Remove all content from `node`
    fn clear_content(&self, node: HostNodeId);

    /// Attach `node` to the document root
    fn mount(&self, node: HostNodeId);

    // =========================================================================
    // Attributes and classes
    // =========================================================================

    /// Set an attribute; setting `class` rewrites the class list
    fn set_attribute(&self, node: HostNodeId, name: &str, value: &str);

    /// Whether the class list of `node` contains `class`
    fn contains_class(&self, node: HostNodeId, class: &str) -> bool;

    /// Append `class` to the class list unless already present
    fn add_class(&self, node: HostNodeId, class: &str);

    /// Replace `old` with `new` at the same position; returns whether `old`
    /// was present
    fn replace_class(&self, node: HostNodeId, old: &str, new: &str) -> bool;

    // =========================================================================
    // Events
    // =========================================================================

    /// Bind a listener for `event`
    fn add_event_listener(&self, node: HostNodeId, event: &str, listener: &Listener);

    /// Unbind a listener previously bound with the same `Rc`
    fn remove_event_listener(&self, node: HostNodeId, event: &str, listener: &Listener);

    // =========================================================================
    // Stylesheet
    // =========================================================================

    /// Insert rule text at `index` in the shared stylesheet
    fn insert_rule(&self, rule: &str, index: usize) -> Result<usize>;

    /// Number of rules in the shared stylesheet
    fn rule_count(&self) -> usize;

    /// Remove every rule from the shared stylesheet
    fn clear_rules(&self);

    // =========================================================================
    // Observation and timing
    // =========================================================================

    /// Current size of `node`
    fn size(&self, node: HostNodeId) -> HostSize;

    /// Call `callback` whenever the size of `node` changes
    fn observe_resize(&self, node: HostNodeId, callback: ResizeCallback) -> ObserverId;

    /// Stop a size-change observer
    fn disconnect(&self, observer: ObserverId);

    /// Run `task` once after `delay`
    fn set_timeout(&self, delay: Duration, task: Task);
}

impl fmt::Debug for dyn Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Host")
    }
}
