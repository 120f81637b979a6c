//! Socket routing
//!
//! A socket is a producer bound to one output of an element: its styles, its
//! attributes, its event bindings, or the child at a given position. When a
//! producer first reads a capability of its [`Source`](crate::Source) the
//! socket is recorded in the matching table of the element's [`SocketRouter`]:
//!
//! - **state table**: re-run on every write to the element's state signal
//! - **host table**: re-run, throttled, when the host node is resized
//!
//! Registration is sticky. Registering a socket under a key that is already
//! present replaces the producer and keeps the key's position, so passes run
//! in first-registration order.

use std::fmt;

use indexmap::IndexMap;
use zuce_style::StyleSet;

use crate::content::{Content, Producer};
use crate::props::{Attributes, Events};

/// Which capability a producer depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// The element's state value
    State,
    /// The element's host node
    Host,
}

/// Identifies the element output a socket writes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SocketKey {
    Styles,
    Attributes,
    Events,
    /// Child at the given position
    Child(usize),
}

/// A producer bound to an element output
pub(crate) enum Socket<S> {
    Styles(Producer<S, StyleSet>),
    Attributes(Producer<S, Attributes>),
    Events(Producer<S, Events>),
    Child(usize, Producer<S, Content>),
}

impl<S> Socket<S> {
    pub(crate) fn key(&self) -> SocketKey {
        match self {
            Socket::Styles(_) => SocketKey::Styles,
            Socket::Attributes(_) => SocketKey::Attributes,
            Socket::Events(_) => SocketKey::Events,
            Socket::Child(index, _) => SocketKey::Child(*index),
        }
    }
}

impl<S> Clone for Socket<S> {
    fn clone(&self) -> Self {
        match self {
            Socket::Styles(producer) => Socket::Styles(producer.clone()),
            Socket::Attributes(producer) => Socket::Attributes(producer.clone()),
            Socket::Events(producer) => Socket::Events(producer.clone()),
            Socket::Child(index, producer) => Socket::Child(*index, producer.clone()),
        }
    }
}

impl<S> fmt::Debug for Socket<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Socket({:?})", self.key())
    }
}

/// The two socket tables of an element
pub(crate) struct SocketRouter<S> {
    state: IndexMap<SocketKey, Socket<S>>,
    host: IndexMap<SocketKey, Socket<S>>,
}

impl<S> Default for SocketRouter<S> {
    fn default() -> Self {
        Self {
            state: IndexMap::new(),
            host: IndexMap::new(),
        }
    }
}

impl<S> SocketRouter<S> {
    fn table(&self, dependency: Dependency) -> &IndexMap<SocketKey, Socket<S>> {
        match dependency {
            Dependency::State => &self.state,
            Dependency::Host => &self.host,
        }
    }

    /// Record `socket`, replacing any socket with the same key in place
    pub(crate) fn register(&mut self, dependency: Dependency, socket: Socket<S>) {
        let table = match dependency {
            Dependency::State => &mut self.state,
            Dependency::Host => &mut self.host,
        };
        table.insert(socket.key(), socket);
    }

    /// The sockets of one table, in registration order
    ///
    /// Passes iterate over this copy so producers may register sockets while
    /// the pass runs.
    pub(crate) fn snapshot(&self, dependency: Dependency) -> Vec<Socket<S>> {
        self.table(dependency).values().cloned().collect()
    }

    pub(crate) fn keys(&self, dependency: Dependency) -> Vec<SocketKey> {
        self.table(dependency).keys().copied().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.state.clear();
        self.host.clear();
    }
}
