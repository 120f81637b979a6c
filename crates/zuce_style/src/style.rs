//! Style sets and rule-text formatting
//!
//! A [`StyleSet`] is an ordered map from property name to [`StyleValue`].
//! Property names are written camelCase or kebab-case; they are kebab-cased
//! when formatted. Numbers get a `px` unit (`s` for `transition`), and a
//! nested set renders as a nested `selector{...}` block:
//!
//! ```rust
//! use zuce_style::StyleSet;
//!
//! let styles = StyleSet::new()
//!     .set("backgroundColor", "pink")
//!     .set("marginTop", 4)
//!     .set("transition", 0.3)
//!     .set("&:hover", StyleSet::new().set("color", "red"));
//!
//! assert_eq!(
//!     styles.to_declarations(),
//!     "background-color:pink;margin-top:4px;transition:0.3s;&:hover{color:red;}"
//! );
//! ```
//!
//! Equality is order-independent, and so is [`StyleSet::canonical_key`],
//! which the class cache uses as its content address.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zuce_core::kebab_case;

/// A single style value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Numeric value; formatted with a unit
    Number(f64),
    /// Literal value, used as-is
    Text(String),
    /// Nested block, e.g. a pseudo-class or media query
    Nested(StyleSet),
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<StyleSet> for StyleValue {
    fn from(value: StyleSet) -> Self {
        StyleValue::Nested(value)
    }
}

macro_rules! number_style_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StyleValue {
                fn from(value: $ty) -> Self {
                    StyleValue::Number(value as f64)
                }
            }
        )*
    };
}

number_style_value!(f64, f32, i32, i64, u32, u64, usize);

/// An ordered set of style declarations
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSet {
    declarations: IndexMap<String, StyleValue>,
}

impl StyleSet {
    /// Create an empty style set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any earlier value for the same name
    pub fn set(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Set a property in place
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<StyleValue>) {
        self.declarations.insert(property.into(), value.into());
    }

    /// Value of a property
    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.declarations.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.declarations
            .iter()
            .map(|(property, value)| (property.as_str(), value))
    }

    /// Order-independent serialization of this set
    ///
    /// Two sets that compare equal always produce the same key, however they
    /// were built.
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        let mut entries: Vec<_> = self.declarations.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        out.push('{');
        for (property, value) in entries {
            let _ = write!(out, "{property:?}:");
            match value {
                StyleValue::Number(n) => {
                    let _ = write!(out, "{n}");
                }
                StyleValue::Text(text) => {
                    let _ = write!(out, "{text:?}");
                }
                StyleValue::Nested(nested) => nested.write_canonical(out),
            }
            out.push(';');
        }
        out.push('}');
    }

    /// Rule body text: kebab-cased properties, unit-suffixed numbers, nested
    /// blocks for nested sets
    pub fn to_declarations(&self) -> String {
        let mut out = String::new();
        for (property, value) in &self.declarations {
            match value {
                StyleValue::Nested(nested) => {
                    let _ = write!(out, "{property}{{{}}}", nested.to_declarations());
                }
                StyleValue::Number(n) => {
                    let unit = unit_for(property);
                    let _ = write!(out, "{}:{n}{unit};", kebab_case(property));
                }
                StyleValue::Text(text) => {
                    let _ = write!(out, "{}:{text};", kebab_case(property));
                }
            }
        }
        out
    }

    /// Rule body text without units, as used inside keyframe blocks
    pub(crate) fn to_plain_declarations(&self) -> String {
        let mut out = String::new();
        for (property, value) in &self.declarations {
            match value {
                StyleValue::Nested(nested) => {
                    let _ = write!(out, "{property}{{{}}}", nested.to_plain_declarations());
                }
                StyleValue::Number(n) => {
                    let _ = write!(out, "{}:{n};", kebab_case(property));
                }
                StyleValue::Text(text) => {
                    let _ = write!(out, "{}:{text};", kebab_case(property));
                }
            }
        }
        out
    }
}

fn unit_for(property: &str) -> &'static str {
    match property {
        "transition" => "s",
        _ => "px",
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_declarations())
    }
}

impl<K, V> FromIterator<(K, V)> for StyleSet
where
    K: Into<String>,
    V: Into<StyleValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = StyleSet::new();
        for (property, value) in iter {
            set.insert(property, value);
        }
        set
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for StyleSet
where
    K: Into<String>,
    V: Into<StyleValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equality_ignores_order() {
        let a = StyleSet::from([("color", "pink"), ("display", "flex")]);
        let b = StyleSet::from([("display", "flex"), ("color", "pink")]);
        assert_eq!(a, b);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_canonical_key_distinguishes_values() {
        let number = StyleSet::new().set("width", 4);
        let text = StyleSet::new().set("width", "4");
        assert_ne!(number.canonical_key(), text.canonical_key());

        let nested = StyleSet::new().set("a", StyleSet::new().set("b", "c"));
        let flat = StyleSet::new().set("a", "{\"b\":\"c\";}");
        assert_ne!(nested.canonical_key(), flat.canonical_key());
    }

    #[test]
    fn test_declarations_keep_insertion_order() {
        let styles = StyleSet::new().set("padding", 2).set("paddingLeft", 0);
        assert_eq!(styles.to_declarations(), "padding:2px;padding-left:0px;");
    }

    #[test]
    fn test_units() {
        let styles = StyleSet::new()
            .set("width", 12.5)
            .set("transition", 1)
            .set("height", "50%");
        assert_eq!(
            styles.to_declarations(),
            "width:12.5px;transition:1s;height:50%;"
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let styles = StyleSet::new()
            .set("color", "red")
            .set("margin", 0)
            .set("color", "blue");
        assert_eq!(styles.len(), 2);
        assert_eq!(styles.to_declarations(), "color:blue;margin:0px;");
    }

    #[test]
    fn test_deserialize_from_json() {
        let styles: StyleSet = serde_json::from_str(
            r#"{"margin": 0, "boxSizing": "border-box", "a:hover": {"color": "red"}}"#,
        )
        .unwrap();
        assert_eq!(styles.get("margin"), Some(&StyleValue::Number(0.0)));
        assert_eq!(
            styles.to_declarations(),
            "margin:0px;box-sizing:border-box;a:hover{color:red;}"
        );
    }
}
