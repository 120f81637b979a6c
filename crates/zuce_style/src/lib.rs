//! zuce Styling
//!
//! Style sets and the content-addressed class cache behind
//! `Element::styles`:
//!
//! - [`StyleSet`] / [`StyleValue`]: ordered declarations with
//!   order-independent equality, formatted to rule text
//! - [`registry`]: monotonic class allocation per distinct style set and
//!   first-write-wins rule insertion into the host stylesheet
//! - [`keyframes()`]: `@keyframes` rule insertion
//!
//! # Example
//!
//! ```ignore
//! use zuce_style::{class_name_for, insert_rule, StyleSet};
//!
//! let pink = StyleSet::from([("color", "pink")]);
//! let class = class_name_for(&pink);
//! insert_rule(&*host, &class.selector(), &pink.to_declarations())?;
//! ```

pub mod keyframes;
pub mod registry;
pub mod style;

pub use keyframes::keyframes;
pub use registry::{class_name_for, insert_rule, reset, with_registry, ClassName, StyleRegistry};
pub use style::{StyleSet, StyleValue};
