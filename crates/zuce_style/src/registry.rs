//! Content-addressed style cache
//!
//! The registry maps each distinct [`StyleSet`] to a short class name and
//! remembers which selectors already have a rule in the host stylesheet.
//!
//! - Class names are allocated monotonically (`_001`, `_002`, ...) and never
//!   reused, reassigned, or evicted.
//! - Rule insertion is idempotent per selector: the first rule inserted for a
//!   selector wins, later attempts are no-ops even if their text differs.
//!
//! There is one registry per UI thread. [`reset`] clears it together with the
//! installed host's stylesheet, so a restarted allocation never meets a stale
//! rule for the same selector. Elements styled before a reset keep class names
//! that no longer have rules.

use std::cell::RefCell;
use std::fmt;

use rustc_hash::FxHashMap;
use zuce_platform::{Host, Result};

use crate::style::StyleSet;

thread_local! {
    static REGISTRY: RefCell<StyleRegistry> = RefCell::new(StyleRegistry::new());
}

/// A class name allocated by the style cache
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(String);

impl ClassName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The class selector, e.g. `._001`
    pub fn selector(&self) -> String {
        format!(".{}", self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Style-set to class-name cache plus the set of inserted selectors
#[derive(Debug, Default)]
pub struct StyleRegistry {
    /// Canonical style key -> allocated class
    classes: FxHashMap<String, ClassName>,
    /// Selector -> index the rule was inserted at
    selectors: FxHashMap<String, usize>,
    /// Last allocated class number
    allocated: u32,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The class for `styles`, allocating one on first sight
    pub fn class_name_for(&mut self, styles: &StyleSet) -> ClassName {
        let key = styles.canonical_key();
        if let Some(existing) = self.classes.get(&key) {
            return existing.clone();
        }

        self.allocated += 1;
        let class = ClassName(format!("_{:03}", self.allocated));
        tracing::debug!(class = %class, styles = %styles, "allocated style class");
        self.classes.insert(key, class.clone());
        class
    }

    /// Insert `selector{body}` at the end of the host stylesheet unless a rule
    /// for `selector` was already inserted
    ///
    /// Returns whether a rule was inserted. Host errors propagate and leave
    /// the selector unrecorded.
    pub fn insert_rule(&mut self, host: &dyn Host, selector: &str, body: &str) -> Result<bool> {
        if self.selectors.contains_key(selector) {
            return Ok(false);
        }

        let index = host.rule_count();
        let index = host.insert_rule(&format!("{selector}{{{body}}}"), index)?;
        tracing::trace!(selector, index, "inserted style rule");
        self.selectors.insert(selector.to_string(), index);
        Ok(true)
    }

    /// Whether a rule for `selector` has been inserted
    pub fn has_selector(&self, selector: &str) -> bool {
        self.selectors.contains_key(selector)
    }

    /// Number of distinct style sets seen
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Forget every class and selector
    ///
    /// Only safe against a host whose stylesheet is cleared too; see [`reset`].
    pub fn clear(&mut self) {
        self.classes.clear();
        self.selectors.clear();
        self.allocated = 0;
    }
}

/// Run `f` with the current thread's registry
pub fn with_registry<R>(f: impl FnOnce(&mut StyleRegistry) -> R) -> R {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

/// The class for `styles` in the current thread's registry
pub fn class_name_for(styles: &StyleSet) -> ClassName {
    with_registry(|registry| registry.class_name_for(styles))
}

/// Insert a rule through the current thread's registry
pub fn insert_rule(host: &dyn Host, selector: &str, body: &str) -> Result<bool> {
    with_registry(|registry| registry.insert_rule(host, selector, body))
}

/// Clear the current thread's registry and the installed host's rule list
pub fn reset() {
    with_registry(StyleRegistry::clear);
    if let Some(host) = zuce_platform::try_current_host() {
        host.clear_rules();
        tracing::debug!("style cache and host stylesheet cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleSet;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use zuce_platform::memory::MemoryHost;

    #[test]
    fn test_same_styles_same_class() {
        let mut registry = StyleRegistry::new();
        let pink = StyleSet::from([("color", "pink"), ("margin", "0")]);
        let pink_again = StyleSet::from([("margin", "0"), ("color", "pink")]);
        let green = StyleSet::from([("color", "green")]);

        let a = registry.class_name_for(&pink);
        let b = registry.class_name_for(&green);
        let c = registry.class_name_for(&pink_again);

        assert_eq!(a.as_str(), "_001");
        assert_eq!(b.as_str(), "_002");
        assert_eq!(a, c);
        assert_eq!(registry.class_count(), 2);
    }

    #[test]
    fn test_insert_rule_first_write_wins() {
        let host = MemoryHost::new();
        let mut registry = StyleRegistry::new();

        assert_eq!(registry.insert_rule(&host, "._001", "color:red;"), Ok(true));
        assert_eq!(registry.insert_rule(&host, "._001", "color:blue;"), Ok(false));
        assert_eq!(registry.insert_rule(&host, "*", "margin:0px;"), Ok(true));

        assert_eq!(host.rules(), vec!["._001{color:red;}", "*{margin:0px;}"]);
        assert!(registry.has_selector("*"));
    }

    #[test]
    fn test_failed_insert_is_not_recorded() {
        let host = MemoryHost::new();
        let mut registry = StyleRegistry::new();

        assert!(registry.insert_rule(&host, "", "color:red;").is_err());
        assert!(!registry.has_selector(""));
        assert!(host.rules().is_empty());
    }

    #[test]
    fn test_reset_restarts_allocation() {
        reset();
        let styles = StyleSet::from([("color", "red")]);
        assert_eq!(class_name_for(&styles).as_str(), "_001");
        assert_eq!(
            class_name_for(&StyleSet::from([("color", "blue")])).as_str(),
            "_002"
        );

        reset();
        assert_eq!(
            class_name_for(&StyleSet::from([("color", "blue")])).as_str(),
            "_001"
        );
        reset();
    }

    #[test]
    fn test_reset_clears_host_rules() {
        let host = Rc::new(MemoryHost::new());
        zuce_platform::install_host(host.clone());
        reset();

        let red = class_name_for(&StyleSet::new().set("color", "red").set("margin", 0));
        insert_rule(&*host, &red.selector(), "color:red;margin:0px;").unwrap();

        reset();
        assert!(host.rules().is_empty());

        let blue = class_name_for(&StyleSet::from([("color", "blue")]));
        assert_eq!(blue.as_str(), "_001");
        assert_eq!(insert_rule(&*host, &blue.selector(), "color:blue;"), Ok(true));
        assert_eq!(host.rules(), vec!["._001{color:blue;}"]);

        zuce_platform::uninstall_host();
        reset();
    }

    #[test]
    fn test_class_selector() {
        let mut registry = StyleRegistry::new();
        let class = registry.class_name_for(&StyleSet::from([("color", "red")]));
        assert_eq!(class.selector(), "._001");
        assert_eq!(class.to_string(), "_001");
    }
}
