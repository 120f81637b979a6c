//! Positional reconciliation
//!
//! Two ways content reaches the host tree:
//!
//! - **full render** materializes an element's whole subtree, used when an
//!   app is mounted or an element is patched into a slot;
//! - **patch** updates a single child position after its producer re-ran,
//!   skipping the host entirely when the new content equals the recorded one.
//!
//! Positions are never renumbered. A full render emits no host node for a
//! boolean child, so host indices after it are shifted relative to the
//! recorded positions; patches address host children by recorded position.

use zuce_platform::{Host, HostNodeId};

use crate::content::{Content, Node};
use crate::element::{Element, ElementInner};

impl<S> Node for ElementInner<S> {
    fn handle(&self) -> HostNodeId {
        self.handle
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn has_children(&self) -> bool {
        !self.children.borrow().is_empty()
    }

    fn render(&self) -> HostNodeId {
        let children = self.children.borrow().clone();
        render_subtree(&*self.host, self.handle, &children)
    }
}

/// Rebuild the content of `handle` from `children` and return a detached
/// fragment holding `handle`
fn render_subtree(host: &dyn Host, handle: HostNodeId, children: &[Content]) -> HostNodeId {
    host.clear_content(handle);

    for child in children {
        match child {
            Content::Element(element) => {
                let node = if element.has_children() {
                    element.render()
                } else {
                    element.handle()
                };
                host.append(handle, node);
            }
            other => {
                if let Some(text) = other.render_text() {
                    let text = host.create_text(&text);
                    host.append(handle, text);
                }
            }
        }
    }

    let fragment = host.create_fragment();
    host.append(fragment, handle);
    fragment
}

impl<S: Clone + 'static> Element<S> {
    /// Fully render this element's subtree
    ///
    /// Returns a detached fragment holding the element, ready to be appended
    /// or mounted.
    pub fn render(&self) -> HostNodeId {
        self.inner.render()
    }

    /// Write `content` to child position `index`
    pub(crate) fn patch_child(&self, index: usize, content: Content) {
        if self.child(index).as_ref() == Some(&content) {
            tracing::trace!(tag = %self.inner.tag, index, "child unchanged");
            return;
        }
        self.record_child(index, content.clone());

        let host = &*self.inner.host;
        let replacement = match &content {
            Content::Element(element) => element.render(),
            other => host.create_text(&other.patch_text().unwrap_or_default()),
        };

        match host.child_at(self.inner.handle, index) {
            Some(existing) => host.replace_with(existing, replacement),
            None => host.append(self.inner.handle, replacement),
        }
        tracing::trace!(tag = %self.inner.tag, index, "child patched");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;
    use crate::runtime;
    use crate::source::Source;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use zuce_core::Signal;
    use zuce_platform::memory::MemoryHost;

    fn setup() -> Rc<MemoryHost> {
        let host = Rc::new(MemoryHost::new());
        runtime::install(host.clone());
        host
    }

    fn mounted(host: &MemoryHost, element: &Element<impl Clone + 'static>) {
        let fragment = element.render();
        host.append(host.root(), fragment);
    }

    #[test]
    fn test_render_nested() {
        let host = setup();
        let inner = Element::stateless("span", ("hi",));
        let empty = Element::stateless("br", ());
        let outer = Element::stateless("div", ("a", inner, 2, empty, Content::Null));

        mounted(&host, &outer);
        assert_eq!(
            host.to_html(outer.handle()),
            "<div>a<span>hi</span>2<br></br></div>"
        );
    }

    #[test]
    fn test_render_skips_booleans() {
        let host = setup();
        let element = Element::stateless("p", ("x", true, false, "y"));
        mounted(&host, &element);

        assert_eq!(host.children(element.handle()).len(), 2);
        assert_eq!(host.text_content(element.handle()), "xy");
    }

    #[test]
    fn test_render_is_repeatable() {
        let host = setup();
        let element = Element::stateless("p", ("one", "two"));
        mounted(&host, &element);
        mounted(&host, &element);

        assert_eq!(host.children(element.handle()).len(), 2);
        assert_eq!(host.children(host.root()), vec![element.handle()]);
    }

    #[test]
    fn test_patch_replaces_at_position() {
        let host = setup();
        let count = Signal::new(0);
        let element = Element::new(
            "p",
            &count,
            ("Count: ", |src: &Source<i32>| *src.state()),
        );
        mounted(&host, &element);
        let label = host.children(element.handle())[0];

        count.set(5);
        assert_eq!(host.text_content(element.handle()), "Count: 5");
        assert_eq!(host.children(element.handle())[0], label);
        element.dispose();
    }

    #[test]
    fn test_patch_equal_content_skips_host() {
        let host = setup();
        let count = Signal::new(1);
        let element = Element::new("p", &count, (|src: &Source<i32>| *src.state() > 0,));
        mounted(&host, &element);

        let before = host.mutation_count();
        count.set(2);
        count.set(3);
        assert_eq!(host.mutation_count(), before);
        element.dispose();
    }

    #[test]
    fn test_patch_scalar_forms() {
        let host = setup();
        let value: Signal<Content> = Signal::new(Content::from("start"));
        let element = Element::new("p", &value, (|src: &Source<Content>| src.state().clone(),));
        mounted(&host, &element);

        value.set(Content::from(true));
        assert_eq!(host.text_content(element.handle()), "true");
        value.set(Content::from(false));
        assert_eq!(host.text_content(element.handle()), "");
        value.set(Content::Null);
        assert_eq!(host.text_content(element.handle()), "");
        value.set(Content::from(1.5));
        assert_eq!(host.text_content(element.handle()), "1.5");
        element.dispose();
    }

    #[test]
    fn test_patch_element_and_back() {
        let host = setup();
        let show = Signal::new(false);
        let badge = Element::stateless("b", ("new",));
        let slot = badge.clone();
        let element = Element::new(
            "div",
            &show,
            (move |src: &Source<bool>| {
                if *src.state() {
                    Content::from(&slot)
                } else {
                    Content::from("-")
                }
            },),
        );
        mounted(&host, &element);

        show.set(true);
        assert_eq!(host.to_html(element.handle()), "<div><b>new</b></div>");
        assert_eq!(host.parent(badge.handle()), Some(element.handle()));

        show.set(false);
        assert_eq!(host.to_html(element.handle()), "<div>-</div>");
        element.dispose();
    }

    #[test]
    fn test_patch_appends_past_host_children() {
        let host = setup();
        let flag = Signal::new(true);
        let element = Element::new(
            "p",
            &flag,
            (true, |src: &Source<bool>| if *src.state() { "on" } else { "off" }),
        );
        mounted(&host, &element);
        assert_eq!(host.text_content(element.handle()), "on");

        // Position 1 has no host child after the boolean was skipped.
        flag.set(false);
        assert_eq!(host.text_content(element.handle()), "onoff");
        element.dispose();
    }
}
