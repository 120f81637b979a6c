//! Per-tag element builders
//!
//! Free functions build stateless elements. The same names on a [`Signal`]
//! (through [`StateElements`]) build elements bound to that signal:
//!
//! ```rust,ignore
//! use zuce_dom::prelude::*;
//!
//! let title = h1(("Inbox",));
//! let unread = signal(3);
//! let badge = unread.span((|src: &Source<u32>| *src.state(),));
//! ```

use zuce_core::Signal;

use crate::content::IntoChildren;
use crate::element::Element;

macro_rules! tags {
    ($($tag:ident),* $(,)?) => {
        $(
            #[doc = concat!("Build a stateless `<", stringify!($tag), ">` element")]
            pub fn $tag(children: impl IntoChildren<()>) -> Element<()> {
                Element::stateless(stringify!($tag), children)
            }
        )*

        /// Tag builders bound to a signal
        pub trait StateElements<S> {
            $(
                #[doc = concat!("Build a `<", stringify!($tag), ">` element bound to this signal")]
                fn $tag(&self, children: impl IntoChildren<S>) -> Element<S>;
            )*

            /// `<img>` takes no children and no state
            fn img(&self) -> Element<()> {
                img()
            }

            /// `<input>` takes no children and no state
            fn input(&self) -> Element<()> {
                input()
            }
        }

        impl<S: Clone + 'static> StateElements<S> for Signal<S> {
            $(
                fn $tag(&self, children: impl IntoChildren<S>) -> Element<S> {
                    Element::new(stringify!($tag), self, children)
                }
            )*
        }
    };
}

tags!(
    a, button, div, form, h1, h2, h3, h4, h5, h6, label, nav, p, span, table, thead, tbody, tfoot,
    th, td, tr,
);

/// Build an `<img>` element
pub fn img() -> Element<()> {
    Element::stateless("img", ())
}

/// Build an `<input>` element
pub fn input() -> Element<()> {
    Element::stateless("input", ())
}
