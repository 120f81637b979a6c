//! Child content
//!
//! A child slot of an element holds a [`Content`]: a scalar rendered as text,
//! a nested element, or one of the "nothing" values. Children are written as
//! plain values or as producers that compute the content from a [`Source`]:
//!
//! ```rust,ignore
//! let count = signal(0);
//! let label = count.p(("Count: ", |src: &Source<i32>| *src.state()));
//! ```

use std::fmt;
use std::rc::Rc;

use zuce_platform::HostNodeId;

use crate::element::Element;
use crate::source::Source;

/// A producer: computes a value from a [`Source`]
pub type Producer<S, T> = Rc<dyn Fn(&Source<S>) -> T>;

/// Object-safe view of an element, independent of its state type
pub(crate) trait Node {
    fn handle(&self) -> HostNodeId;
    fn tag(&self) -> &str;
    fn has_children(&self) -> bool;
    fn render(&self) -> HostNodeId;
}

/// Type-erased element handle
///
/// Two handles are equal when they refer to the same element.
#[derive(Clone)]
pub struct AnyElement(pub(crate) Rc<dyn Node>);

impl AnyElement {
    /// Host handle of the element
    pub fn handle(&self) -> HostNodeId {
        self.0.handle()
    }

    pub fn tag(&self) -> &str {
        self.0.tag()
    }

    pub fn has_children(&self) -> bool {
        self.0.has_children()
    }

    /// Fully render the element's subtree; see [`Element::render`]
    pub fn render(&self) -> HostNodeId {
        self.0.render()
    }

    pub fn ptr_eq(&self, other: &AnyElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for AnyElement {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for AnyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyElement")
            .field("tag", &self.tag())
            .field("handle", &self.handle())
            .finish()
    }
}

/// The value held by a child slot
///
/// Equality is value equality for scalars and identity for elements, which is
/// what the reconciler uses to skip redundant patches.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Explicit "no value"
    Null,
    /// Nothing was produced
    Absent,
    Element(AnyElement),
}

impl Content {
    /// Text used when the content is patched into a slot
    ///
    /// `true` becomes `"true"`; `false`, null and absent become empty text.
    /// Elements have no text form.
    pub fn patch_text(&self) -> Option<String> {
        match self {
            Content::Text(text) => Some(text.clone()),
            Content::Number(n) => Some(n.to_string()),
            Content::Bool(true) => Some("true".to_string()),
            Content::Bool(false) | Content::Null | Content::Absent => Some(String::new()),
            Content::Element(_) => None,
        }
    }

    /// Text used when the content is rendered as part of a full render
    ///
    /// Booleans produce no host node at all and return `None`, as do elements.
    pub fn render_text(&self) -> Option<String> {
        match self {
            Content::Bool(_) | Content::Element(_) => None,
            Content::Text(text) => Some(text.clone()),
            Content::Number(n) => Some(n.to_string()),
            Content::Null | Content::Absent => Some(String::new()),
        }
    }

    pub fn as_element(&self) -> Option<&AnyElement> {
        match self {
            Content::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<&String> for Content {
    fn from(value: &String) -> Self {
        Content::Text(value.clone())
    }
}

impl From<bool> for Content {
    fn from(value: bool) -> Self {
        Content::Bool(value)
    }
}

impl From<AnyElement> for Content {
    fn from(value: AnyElement) -> Self {
        Content::Element(value)
    }
}

impl<S: Clone + 'static> From<Element<S>> for Content {
    fn from(value: Element<S>) -> Self {
        Content::Element(value.into_any())
    }
}

impl<S: Clone + 'static> From<&Element<S>> for Content {
    fn from(value: &Element<S>) -> Self {
        Content::Element(value.clone().into_any())
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map_or(Content::Null, Into::into)
    }
}

macro_rules! number_content {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Content {
                fn from(value: $ty) -> Self {
                    Content::Number(value as f64)
                }
            }
        )*
    };
}

number_content!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// A child as written at construction time
pub enum Child<S> {
    /// Fixed content
    Content(Content),
    /// Content computed from a [`Source`], re-run when its dependency changes
    Producer(Producer<S, Content>),
}

impl<S> Clone for Child<S> {
    fn clone(&self) -> Self {
        match self {
            Child::Content(content) => Child::Content(content.clone()),
            Child::Producer(producer) => Child::Producer(producer.clone()),
        }
    }
}

impl<S> fmt::Debug for Child<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Content(content) => f.debug_tuple("Content").field(content).finish(),
            Child::Producer(_) => f.write_str("Producer"),
        }
    }
}

/// Conversion into a single child
///
/// Implemented for scalars, elements, [`Content`], and closures
/// `Fn(&Source<S>) -> impl Into<Content>`. Closures must annotate their
/// argument type, e.g. `|src: &Source<bool>| ...`.
pub trait IntoChild<S> {
    fn into_child(self) -> Child<S>;
}

impl<S> IntoChild<S> for Child<S> {
    fn into_child(self) -> Child<S> {
        self
    }
}

impl<S, F, R> IntoChild<S> for F
where
    F: Fn(&Source<S>) -> R + 'static,
    R: Into<Content>,
{
    fn into_child(self) -> Child<S> {
        Child::Producer(Rc::new(move |source: &Source<S>| self(source).into()))
    }
}

impl<S, T: Clone + 'static> IntoChild<S> for Element<T> {
    fn into_child(self) -> Child<S> {
        Child::Content(self.into())
    }
}

macro_rules! content_child {
    ($($ty:ty),*) => {
        $(
            impl<S> IntoChild<S> for $ty {
                fn into_child(self) -> Child<S> {
                    Child::Content(self.into())
                }
            }
        )*
    };
}

content_child!(
    Content, AnyElement, &str, String, &String, bool, f64, f32, i8, i16, i32, i64, u8, u16, u32,
    u64, usize, isize
);

/// Conversion into an ordered list of children
///
/// Implemented for `()`, tuples of up to twelve [`IntoChild`] values, and
/// `Vec<Child<S>>` for lists built at runtime.
pub trait IntoChildren<S> {
    fn into_children(self) -> Vec<Child<S>>;
}

impl<S> IntoChildren<S> for () {
    fn into_children(self) -> Vec<Child<S>> {
        Vec::new()
    }
}

impl<S> IntoChildren<S> for Vec<Child<S>> {
    fn into_children(self) -> Vec<Child<S>> {
        self
    }
}

macro_rules! tuple_children {
    ($($name:ident),+) => {
        impl<S, $($name: IntoChild<S>),+> IntoChildren<S> for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_children(self) -> Vec<Child<S>> {
                let ($($name,)+) = self;
                vec![$($name.into_child()),+]
            }
        }
    };
}

tuple_children!(A);
tuple_children!(A, B);
tuple_children!(A, B, C);
tuple_children!(A, B, C, D);
tuple_children!(A, B, C, D, E);
tuple_children!(A, B, C, D, E, F);
tuple_children!(A, B, C, D, E, F, G);
tuple_children!(A, B, C, D, E, F, G, H);
tuple_children!(A, B, C, D, E, F, G, H, I);
tuple_children!(A, B, C, D, E, F, G, H, I, J);
tuple_children!(A, B, C, D, E, F, G, H, I, J, K);
tuple_children!(A, B, C, D, E, F, G, H, I, J, K, L);
