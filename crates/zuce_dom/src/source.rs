//! Producer arguments and dependency tracking
//!
//! Every producer receives a [`Source`]. Reading [`Source::state`] or
//! [`Source::host`] on the producer's first run decides which table the
//! producer is registered in; later runs get a passive source that records
//! nothing.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use zuce_platform::{Host, HostNodeId, HostSize};

use crate::element::Element;
use crate::socket::{Dependency, Socket};

/// Read access to the host node of an element
#[derive(Clone)]
pub struct HostView {
    host: Rc<dyn Host>,
    node: HostNodeId,
}

impl HostView {
    pub(crate) fn new(host: Rc<dyn Host>, node: HostNodeId) -> Self {
        Self { host, node }
    }

    pub fn id(&self) -> HostNodeId {
        self.node
    }

    /// Current size of the node
    pub fn size(&self) -> HostSize {
        self.host.size(self.node)
    }
}

impl fmt::Debug for HostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostView").field("node", &self.node).finish()
    }
}

/// First-run registration context
struct Tracker<S> {
    element: Element<S>,
    socket: Socket<S>,
    classified: Cell<bool>,
}

/// The argument passed to producers
pub struct Source<S> {
    state: S,
    host: HostView,
    tracker: Option<Tracker<S>>,
}

impl<S: Clone + 'static> Source<S> {
    /// Source for a producer's first run; the first capability read
    /// registers `socket` with `element`
    pub(crate) fn tracking(element: &Element<S>, socket: Socket<S>) -> Self {
        Self {
            state: element.snapshot(),
            host: element.host_view(),
            tracker: Some(Tracker {
                element: element.clone(),
                socket,
                classified: Cell::new(false),
            }),
        }
    }

    /// Source for re-runs
    pub(crate) fn passive(element: &Element<S>) -> Self {
        Self {
            state: element.snapshot(),
            host: element.host_view(),
            tracker: None,
        }
    }

    /// The element's state value at the time the producer was called
    pub fn state(&self) -> &S {
        self.track(Dependency::State);
        &self.state
    }

    /// The element's host node
    pub fn host(&self) -> &HostView {
        self.track(Dependency::Host);
        &self.host
    }

    fn track(&self, dependency: Dependency) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        if tracker.classified.replace(true) {
            return;
        }
        tracker.element.register(dependency, tracker.socket.clone());
    }
}

impl<S: Clone + fmt::Debug + 'static> fmt::Debug for Source<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("state", &self.state)
            .field("host", &self.host)
            .field("tracking", &self.tracker.is_some())
            .finish()
    }
}
