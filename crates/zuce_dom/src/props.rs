//! Attribute and event maps, and the prop conversion used by the element
//! builder methods

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use zuce_platform::{HostEvent, Listener};
use zuce_style::StyleSet;

use crate::content::Producer;
use crate::source::Source;

/// Attribute name to string value, in insertion order
///
/// Names may be camelCase; they are kebab-cased when applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    values: IndexMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any earlier value
    pub fn set(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Event name to handler, in insertion order
///
/// Each call to [`Events::on`] allocates a new listener. Rebinding an element
/// with a fresh map unbinds the listeners of the previous map first.
#[derive(Clone, Default)]
pub struct Events {
    handlers: IndexMap<String, Listener>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for `event`, replacing any earlier one
    pub fn on(mut self, event: impl Into<String>, handler: impl Fn(&HostEvent) + 'static) -> Self {
        self.insert(event, Rc::new(handler));
        self
    }

    /// Add an existing listener for `event`
    pub fn insert(&mut self, event: impl Into<String>, listener: Listener) {
        self.handlers.insert(event.into(), listener);
    }

    pub fn get(&self, event: &str) -> Option<&Listener> {
        self.handlers.get(event)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Listener)> {
        self.handlers
            .iter()
            .map(|(event, listener)| (event.as_str(), listener))
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// A builder-method argument: a value, or a producer of one
pub enum Prop<S, T> {
    Value(T),
    Producer(Producer<S, T>),
}

/// Conversion into a [`Prop`]
///
/// Implemented for [`StyleSet`], [`Attributes`] and [`Events`] values and for
/// closures `Fn(&Source<S>) -> T`.
pub trait IntoProp<S, T> {
    fn into_prop(self) -> Prop<S, T>;
}

impl<S, T, F> IntoProp<S, T> for F
where
    F: Fn(&Source<S>) -> T + 'static,
{
    fn into_prop(self) -> Prop<S, T> {
        Prop::Producer(Rc::new(self))
    }
}

macro_rules! value_prop {
    ($($ty:ty),*) => {
        $(
            impl<S> IntoProp<S, $ty> for $ty {
                fn into_prop(self) -> Prop<S, $ty> {
                    Prop::Value(self)
                }
            }
        )*
    };
}

value_prop!(StyleSet, Attributes, Events);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn test_attributes_builder() {
        let attributes = Attributes::new()
            .set("id", "main")
            .set("tabIndex", 2)
            .set("id", "other");
        assert_eq!(attributes.len(), 2);
        assert_eq!(
            attributes.iter().collect::<Vec<_>>(),
            vec![("id", "other"), ("tabIndex", "2")]
        );
    }

    #[test]
    fn test_attributes_from_array() {
        let attributes = Attributes::from([("href", "/"), ("title", "home")]);
        assert_eq!(attributes.get("title"), Some("home"));
    }

    #[test]
    fn test_events_on_allocates_listeners() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let events = Events::new().on("click", move |_| counter.set(counter.get() + 1));
        assert_eq!(events.len(), 1);
        assert_eq!(format!("{events:?}"), r#"{"click"}"#);

        let listener = events.get("click").unwrap();
        listener(&HostEvent {
            name: "click".to_string(),
            target: Default::default(),
        });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_prop_conversion() {
        let value: Prop<(), StyleSet> = StyleSet::new().into_prop();
        assert!(matches!(value, Prop::Value(_)));

        let producer: Prop<bool, Attributes> =
            (|src: &Source<bool>| Attributes::new().set("open", *src.state())).into_prop();
        assert!(matches!(producer, Prop::Producer(_)));
    }
}
