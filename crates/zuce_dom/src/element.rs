//! Reactive elements
//!
//! An [`Element`] owns one host node and the state that drives it. Builder
//! methods take either a value or a producer closure; producers run once
//! immediately and are registered as sockets when they read a capability of
//! their [`Source`]:
//!
//! ```rust,ignore
//! use zuce_dom::prelude::*;
//!
//! let open = signal(false);
//! let panel = open
//!     .div(("Details",))
//!     .attributes(|src: &Source<bool>| Attributes::new().set("aria-expanded", *src.state()))
//!     .styles(StyleSet::new().set("padding", 8));
//!
//! open.set(true); // re-runs the attribute producer, patches the host node
//! ```
//!
//! Elements bound to a signal stay subscribed until [`Element::dispose`] is
//! called, even when every handle to them is dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use zuce_core::{kebab_case, Signal, Subscription};
use zuce_platform::{current_host, Host, HostNodeId, ObserverId};
use zuce_style::{ClassName, StyleSet};

use crate::content::{AnyElement, Child, Content, IntoChildren, Producer};
use crate::error::Result;
use crate::props::{Attributes, Events, IntoProp, Prop};
use crate::runtime;
use crate::socket::{Dependency, Socket, SocketKey, SocketRouter};
use crate::source::{HostView, Source};
use crate::throttle::Throttle;

/// Where an element's state value comes from
enum Binding<S> {
    Signal(Signal<S>),
    /// Stateless elements carry a fixed `()`
    Fixed(S),
}

pub(crate) struct ElementInner<S> {
    pub(crate) tag: String,
    pub(crate) host: Rc<dyn Host>,
    pub(crate) handle: HostNodeId,
    binding: Binding<S>,
    /// Last content recorded per child position
    pub(crate) children: RefCell<Vec<Content>>,
    style_class: RefCell<Option<ClassName>>,
    previous_events: RefCell<Events>,
    router: RefCell<SocketRouter<S>>,
    subscription: RefCell<Option<Subscription<S>>>,
    observer: Cell<Option<ObserverId>>,
}

impl<S> Drop for ElementInner<S> {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            self.host.disconnect(observer);
        }
    }
}

/// A host element driven by producers over state `S`
pub struct Element<S = ()> {
    pub(crate) inner: Rc<ElementInner<S>>,
}

impl<S> Clone for Element<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> fmt::Debug for Element<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.inner.tag)
            .field("handle", &self.inner.handle)
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl Element<()> {
    /// Build an element with no state
    ///
    /// Producers still run and may depend on the host node.
    pub fn stateless(tag: &str, children: impl IntoChildren<()>) -> Self {
        Self::build(tag, Binding::Fixed(()), children.into_children())
    }
}

impl<S: Clone + 'static> Element<S> {
    /// Build an element bound to `state`
    ///
    /// The element subscribes immediately; every write to `state` re-runs the
    /// producers that read it.
    pub fn new(tag: &str, state: &Signal<S>, children: impl IntoChildren<S>) -> Self {
        Self::build(tag, Binding::Signal(state.clone()), children.into_children())
    }

    fn build(tag: &str, binding: Binding<S>, children: Vec<Child<S>>) -> Self {
        let host = current_host();
        let handle = host.create_element(tag);
        let element = Self {
            inner: Rc::new(ElementInner {
                tag: tag.to_string(),
                host,
                handle,
                binding,
                children: RefCell::new(Vec::with_capacity(children.len())),
                style_class: RefCell::new(None),
                previous_events: RefCell::new(Events::new()),
                router: RefCell::new(SocketRouter::default()),
                subscription: RefCell::new(None),
                observer: Cell::new(None),
            }),
        };

        if let Binding::Signal(signal) = &element.inner.binding {
            let bound = element.clone();
            let subscription = signal.subscribe(move |_| bound.run_pass(Dependency::State));
            *element.inner.subscription.borrow_mut() = Some(subscription);
        }

        for (index, child) in children.into_iter().enumerate() {
            let content = match child {
                Child::Content(content) => content,
                Child::Producer(producer) => {
                    element.resolve(producer, |producer| Socket::Child(index, producer))
                }
            };
            element.record_child(index, content);
        }

        tracing::trace!(tag, ?handle, "element created");
        element
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// Host handle of this element
    pub fn handle(&self) -> HostNodeId {
        self.inner.handle
    }

    /// The bound signal, if any
    pub fn state(&self) -> Option<&Signal<S>> {
        match &self.inner.binding {
            Binding::Signal(signal) => Some(signal),
            Binding::Fixed(_) => None,
        }
    }

    /// Content last recorded at `index`
    pub fn child(&self, index: usize) -> Option<Content> {
        self.inner.children.borrow().get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Class assigned by the last non-empty style application
    pub fn style_class(&self) -> Option<ClassName> {
        self.inner.style_class.borrow().clone()
    }

    /// Keys of the sockets registered for `dependency`, in pass order
    pub fn socket_keys(&self, dependency: Dependency) -> Vec<SocketKey> {
        self.inner.router.borrow().keys(dependency)
    }

    /// Whether a size observer is attached
    pub fn is_observed(&self) -> bool {
        self.inner.observer.get().is_some()
    }

    pub fn into_any(self) -> AnyElement {
        AnyElement(self.inner)
    }

    pub fn ptr_eq(&self, other: &Element<S>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Apply styles, logging host failures
    ///
    /// A rejected rule is reported through `tracing::error!` and does not
    /// reach the caller, here or in later passes. Use [`Element::try_styles`]
    /// to receive the error from the first application.
    pub fn styles(self, styles: impl IntoProp<S, StyleSet>) -> Self {
        let styles = self.resolve_prop(styles.into_prop(), Socket::Styles);
        if let Err(error) = self.apply_styles(&styles) {
            tracing::error!(tag = %self.inner.tag, %error, "failed to apply styles");
        }
        self
    }

    /// Apply styles, returning host failures to the caller
    pub fn try_styles(self, styles: impl IntoProp<S, StyleSet>) -> Result<Self> {
        let styles = self.resolve_prop(styles.into_prop(), Socket::Styles);
        self.apply_styles(&styles)?;
        Ok(self)
    }

    pub fn attributes(self, attributes: impl IntoProp<S, Attributes>) -> Self {
        let attributes = self.resolve_prop(attributes.into_prop(), Socket::Attributes);
        self.apply_attributes(&attributes);
        self
    }

    pub fn events(self, events: impl IntoProp<S, Events>) -> Self {
        let events = self.resolve_prop(events.into_prop(), Socket::Events);
        self.apply_events(events);
        self
    }

    /// Detach this element from its signal and size observer and drop every
    /// registered socket
    ///
    /// The host node and its current content are left as they are.
    pub fn dispose(&self) {
        let subscription = self.inner.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        if let Some(observer) = self.inner.observer.take() {
            self.inner.host.disconnect(observer);
        }
        self.inner.router.borrow_mut().clear();
        tracing::debug!(tag = %self.inner.tag, "element disposed");
    }

    // =========================================================================
    // Producers and passes
    // =========================================================================

    fn resolve_prop<T>(
        &self,
        prop: Prop<S, T>,
        socket: impl FnOnce(Producer<S, T>) -> Socket<S>,
    ) -> T {
        match prop {
            Prop::Value(value) => value,
            Prop::Producer(producer) => self.resolve(producer, socket),
        }
    }

    /// First run of a producer with a tracking source
    fn resolve<T>(
        &self,
        producer: Producer<S, T>,
        socket: impl FnOnce(Producer<S, T>) -> Socket<S>,
    ) -> T {
        let source = Source::tracking(self, socket(producer.clone()));
        producer(&source)
    }

    pub(crate) fn snapshot(&self) -> S {
        match &self.inner.binding {
            Binding::Signal(signal) => signal.get(),
            Binding::Fixed(value) => value.clone(),
        }
    }

    pub(crate) fn host_view(&self) -> HostView {
        HostView::new(self.inner.host.clone(), self.inner.handle)
    }

    pub(crate) fn register(&self, dependency: Dependency, socket: Socket<S>) {
        tracing::trace!(
            tag = %self.inner.tag,
            key = ?socket.key(),
            ?dependency,
            "socket registered"
        );
        self.inner.router.borrow_mut().register(dependency, socket);
        if dependency == Dependency::Host {
            self.observe_host();
        }
    }

    /// Attach the throttled size observer on first host registration
    fn observe_host(&self) {
        if self.inner.observer.get().is_some() {
            return;
        }

        let element = Rc::downgrade(&self.inner);
        let throttle = Throttle::new(&self.inner.host, runtime::resize_throttle(), move || {
            if let Some(inner) = element.upgrade() {
                Element { inner }.run_pass(Dependency::Host);
            }
        });
        let observer = self
            .inner
            .host
            .observe_resize(self.inner.handle, Rc::new(move || throttle.call()));
        self.inner.observer.set(Some(observer));
        tracing::debug!(tag = %self.inner.tag, "observing host size");
    }

    /// Re-run every socket of one table with a passive source
    ///
    /// Passes run from signal and timer callbacks, so host failures are
    /// logged rather than returned.
    pub(crate) fn run_pass(&self, dependency: Dependency) {
        let sockets = self.inner.router.borrow().snapshot(dependency);
        if sockets.is_empty() {
            return;
        }
        tracing::trace!(
            tag = %self.inner.tag,
            ?dependency,
            sockets = sockets.len(),
            "running pass"
        );

        for socket in sockets {
            let source = Source::passive(self);
            match socket {
                Socket::Styles(producer) => {
                    if let Err(error) = self.apply_styles(&producer(&source)) {
                        tracing::error!(tag = %self.inner.tag, %error, "failed to apply styles");
                    }
                }
                Socket::Attributes(producer) => self.apply_attributes(&producer(&source)),
                Socket::Events(producer) => self.apply_events(producer(&source)),
                Socket::Child(index, producer) => self.patch_child(index, producer(&source)),
            }
        }
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    pub(crate) fn record_child(&self, index: usize, content: Content) {
        let mut children = self.inner.children.borrow_mut();
        if children.len() <= index {
            children.resize(index + 1, Content::Absent);
        }
        children[index] = content;
    }

    fn apply_styles(&self, styles: &StyleSet) -> zuce_platform::Result<()> {
        if styles.is_empty() {
            return Ok(());
        }

        let host = &*self.inner.host;
        let handle = self.inner.handle;
        let class = zuce_style::class_name_for(styles);
        let previous = self.inner.style_class.replace(Some(class.clone()));
        match previous {
            Some(previous) if host.contains_class(handle, previous.as_str()) => {
                host.replace_class(handle, previous.as_str(), class.as_str());
            }
            _ => host.add_class(handle, class.as_str()),
        }

        zuce_style::insert_rule(host, &class.selector(), &styles.to_declarations())?;
        Ok(())
    }

    fn apply_attributes(&self, attributes: &Attributes) {
        let host = &*self.inner.host;
        let handle = self.inner.handle;
        for (name, value) in attributes.iter() {
            host.set_attribute(handle, &kebab_case(name), value);
            // Writing `class` wipes the list; keep the style class on it.
            if name == "class" {
                if let Some(class) = self.inner.style_class.borrow().as_ref() {
                    host.add_class(handle, class.as_str());
                }
            }
        }
    }

    fn apply_events(&self, events: Events) {
        if events.is_empty() {
            return;
        }

        let host = &*self.inner.host;
        let handle = self.inner.handle;
        let previous = self.inner.previous_events.replace(Events::new());
        for (event, listener) in previous.iter() {
            host.remove_event_listener(handle, event, listener);
        }
        for (event, listener) in events.iter() {
            host.add_event_listener(handle, event, listener);
        }
        *self.inner.previous_events.borrow_mut() = events;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zuce_platform::memory::MemoryHost;

    fn setup() -> Rc<MemoryHost> {
        let host = Rc::new(MemoryHost::new());
        runtime::install(host.clone());
        host
    }

    #[test]
    fn test_producer_classification() {
        let _host = setup();
        let flag = Signal::new(false);

        let element = Element::new(
            "div",
            &flag,
            (
                "fixed",
                |_: &Source<bool>| "constant",
                |src: &Source<bool>| *src.state(),
                |src: &Source<bool>| src.host().size().width,
            ),
        );

        assert_eq!(element.socket_keys(Dependency::State), vec![SocketKey::Child(2)]);
        assert_eq!(element.socket_keys(Dependency::Host), vec![SocketKey::Child(3)]);
        assert!(element.is_observed());
        element.dispose();
    }

    #[test]
    fn test_first_read_wins() {
        let _host = setup();
        let flag = Signal::new(1);

        let element = Element::new(
            "p",
            &flag,
            (|src: &Source<i32>| {
                let width = src.host().size().width;
                format!("{}:{}", src.state(), width)
            },),
        );

        assert_eq!(element.socket_keys(Dependency::Host), vec![SocketKey::Child(0)]);
        assert!(element.socket_keys(Dependency::State).is_empty());
        element.dispose();
    }

    #[test]
    fn test_same_key_replaces_in_place() {
        let _host = setup();
        let flag = Signal::new(false);

        let element = Element::new("div", &flag, (|src: &Source<bool>| *src.state(),))
            .attributes(|src: &Source<bool>| Attributes::new().set("data-on", *src.state()))
            .attributes(|src: &Source<bool>| Attributes::new().set("title", *src.state()));

        assert_eq!(
            element.socket_keys(Dependency::State),
            vec![SocketKey::Child(0), SocketKey::Attributes]
        );
        element.dispose();
    }

    #[test]
    fn test_subscription_until_dispose() {
        let _host = setup();
        let flag = Signal::new(false);

        let element = Element::new("div", &flag, ());
        assert_eq!(flag.subscriber_count(), 1);

        element.dispose();
        assert_eq!(flag.subscriber_count(), 0);
        assert!(element.socket_keys(Dependency::State).is_empty());
    }

    #[test]
    fn test_stateless_has_no_state() {
        let _host = setup();
        let element = Element::stateless("span", ("a", "b"));
        assert!(element.state().is_none());
        assert_eq!(element.child_count(), 2);
        assert_eq!(element.child(1), Some(Content::from("b")));
    }

    #[test]
    fn test_styles_swap_class() {
        let host = setup();
        let element = Element::stateless("div", ())
            .styles(StyleSet::from([("color", "red")]))
            .styles(StyleSet::from([("color", "blue")]));

        assert_eq!(host.classes(element.handle()), vec!["_002"]);
        assert_eq!(element.style_class().map(|c| c.to_string()).as_deref(), Some("_002"));
        assert_eq!(host.rules(), vec!["._001{color:red;}", "._002{color:blue;}"]);
    }

    #[test]
    fn test_state_pass_swaps_class_in_place() {
        let host = setup();
        let flag = Signal::new(false);

        let element = Element::new("div", &flag, ())
            .attributes(Attributes::from([("class", "card")]))
            .styles(|src: &Source<bool>| {
                StyleSet::new().set("color", if *src.state() { "blue" } else { "red" })
            });
        host.add_class(element.handle(), "extra");
        assert_eq!(host.classes(element.handle()), vec!["card", "_001", "extra"]);

        flag.set(true);
        assert_eq!(host.classes(element.handle()), vec!["card", "_002", "extra"]);
        element.dispose();
    }

    #[test]
    fn test_state_socket_stays_after_reads_stop() {
        let _host = setup();
        let flag = Signal::new(0);
        let runs = Rc::new(Cell::new(0u32));

        let counter = runs.clone();
        let element = Element::new(
            "p",
            &flag,
            (move |src: &Source<i32>| {
                counter.set(counter.get() + 1);
                if counter.get() == 1 {
                    src.state().to_string()
                } else {
                    "later".to_string()
                }
            },),
        );

        flag.set(1);
        flag.set(2);
        assert_eq!(runs.get(), 3);
        assert_eq!(element.socket_keys(Dependency::State), vec![SocketKey::Child(0)]);
        assert_eq!(element.child(0), Some(Content::from("later")));
        element.dispose();
    }

    #[test]
    fn test_empty_outputs_are_noops() {
        let host = setup();
        let element = Element::stateless("div", ());
        let before = host.mutation_count();

        let element = element
            .styles(StyleSet::new())
            .attributes(Attributes::new())
            .events(Events::new());

        assert_eq!(host.mutation_count(), before);
        assert!(element.style_class().is_none());
        assert!(host.rules().is_empty());
    }

    #[test]
    fn test_events_rebind_replaces_handlers() {
        let host = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (first, second) = (log.clone(), log.clone());

        let button = Element::stateless("button", ())
            .events(Events::new().on("click", move |_| first.borrow_mut().push("a")))
            .events(Events::new().on("click", move |_| second.borrow_mut().push("b")));

        assert_eq!(host.dispatch(button.handle(), "click"), 1);
        assert_eq!(*log.borrow(), vec!["b"]);
    }

    #[test]
    fn test_class_attribute_keeps_style_class() {
        let host = setup();
        let element = Element::stateless("div", ())
            .styles(StyleSet::from([("margin", 0)]))
            .attributes(Attributes::from([("class", "card")]));

        assert_eq!(host.classes(element.handle()), vec!["card", "_001"]);
    }

    #[test]
    fn test_attribute_names_are_kebab_cased() {
        let host = setup();
        let element =
            Element::stateless("input", ()).attributes(Attributes::from([("ariaLabel", "name")]));
        assert_eq!(
            host.attribute(element.handle(), "aria-label").as_deref(),
            Some("name")
        );
    }

    #[test]
    fn test_try_styles_propagates_host_errors() {
        let _host = setup();
        let malformed = StyleSet::new().set("color", "red}");
        let result = Element::stateless("div", ()).try_styles(malformed);
        assert!(matches!(
            result,
            Err(crate::Error::Platform(zuce_platform::PlatformError::InvalidRule(_)))
        ));
    }

    #[test]
    fn test_styles_logs_host_errors() {
        let host = setup();
        let element = Element::stateless("div", ())
            .styles(StyleSet::new().set("color", "red}"))
            .attributes(Attributes::from([("id", "still-built")]));

        assert!(host.rules().is_empty());
        assert_eq!(
            host.attribute(element.handle(), "id").as_deref(),
            Some("still-built")
        );
    }
}
