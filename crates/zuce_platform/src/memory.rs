//! In-memory host
//!
//! A plain tree that implements [`Host`] with DOM-like semantics (fragments
//! move their children, `class` is an attribute, `replace_with` on a detached
//! node does nothing). It adds inspection helpers, event dispatch, resize
//! simulation, and a manual clock so deferred work runs deterministically:
//!
//! ```ignore
//! use std::time::Duration;
//! use zuce_platform::memory::MemoryHost;
//! use zuce_platform::Host;
//!
//! let host = MemoryHost::new();
//! let div = host.create_element("div");
//! host.set_attribute(div, "id", "main");
//! host.mount(div);
//!
//! assert_eq!(host.find_by_id("main"), Some(div));
//! assert_eq!(host.to_html(div), r#"<div id="main"></div>"#);
//!
//! host.advance(Duration::from_millis(100));
//! ```
//!
//! Nodes are never freed; the host is meant for short-lived test trees.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use slotmap::SlotMap;

use crate::error::{PlatformError, Result};
use crate::host::{
    Host, HostEvent, HostNodeId, HostSize, Listener, ObserverId, ResizeCallback, Task,
};

enum NodeKind {
    Root,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        listeners: Vec<(String, Listener)>,
    },
    Text(String),
    Fragment,
}

struct MemoryNode {
    kind: NodeKind,
    parent: Option<HostNodeId>,
    children: Vec<HostNodeId>,
    size: HostSize,
}

impl MemoryNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            size: HostSize::default(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.kind {
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn set_classes(&mut self, classes: &[String]) {
        self.set_attribute("class", &classes.join(" "));
    }
}

struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

struct MemoryState {
    nodes: SlotMap<HostNodeId, MemoryNode>,
    root: HostNodeId,
    rules: Vec<String>,
    observers: SlotMap<ObserverId, (HostNodeId, ResizeCallback)>,
    timers: Vec<Timer>,
    now: Duration,
    next_seq: u64,
    mutations: u64,
}

impl MemoryState {
    fn detach(&mut self, node: HostNodeId) {
        let Some(parent) = self.nodes.get_mut(node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|child| *child != node);
        }
    }

    /// The nodes that end up in a parent when `node` is inserted: a
    /// fragment's children (taken out of it) or the node itself.
    fn take_insertable(&mut self, node: HostNodeId) -> Vec<HostNodeId> {
        let is_fragment = matches!(
            self.nodes.get(node).map(|n| &n.kind),
            Some(NodeKind::Fragment)
        );
        if is_fragment {
            let children = self
                .nodes
                .get_mut(node)
                .map(|n| std::mem::take(&mut n.children))
                .unwrap_or_default();
            for child in &children {
                if let Some(child) = self.nodes.get_mut(*child) {
                    child.parent = None;
                }
            }
            children
        } else {
            self.detach(node);
            vec![node]
        }
    }

    fn adopt(&mut self, parent: HostNodeId, nodes: &[HostNodeId]) {
        for node in nodes {
            if let Some(node) = self.nodes.get_mut(*node) {
                node.parent = Some(parent);
            }
        }
    }

    fn collect_text(&self, node: HostNodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(node) else {
            return;
        };
        if let NodeKind::Text(text) = &entry.kind {
            out.push_str(text);
        }
        for child in &entry.children {
            self.collect_text(*child, out);
        }
    }

    fn write_html(&self, node: HostNodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Root | NodeKind::Fragment => {
                for child in &entry.children {
                    self.write_html(*child, out);
                }
            }
            NodeKind::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {name}=\"{value}\""));
                }
                out.push('>');
                for child in &entry.children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }

    fn find(&self, node: HostNodeId, pred: &dyn Fn(&MemoryNode) -> bool) -> Option<HostNodeId> {
        let entry = self.nodes.get(node)?;
        if pred(entry) {
            return Some(node);
        }
        entry.children.iter().find_map(|child| self.find(*child, pred))
    }
}

/// Host implementation backed by an in-memory tree
pub struct MemoryHost {
    state: RefCell<MemoryState>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create a host with an empty document root, stylesheet, and clock at 0
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(MemoryNode::new(NodeKind::Root));
        Self {
            state: RefCell::new(MemoryState {
                nodes,
                root,
                rules: Vec::new(),
                observers: SlotMap::with_key(),
                timers: Vec::new(),
                now: Duration::ZERO,
                next_seq: 0,
                mutations: 0,
            }),
        }
    }

    fn insert_node(&self, kind: NodeKind) -> HostNodeId {
        self.state.borrow_mut().nodes.insert(MemoryNode::new(kind))
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        let mut state = self.state.borrow_mut();
        state.mutations += 1;
        f(&mut state)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// The document root that [`Host::mount`] appends to
    pub fn root(&self) -> HostNodeId {
        self.state.borrow().root
    }

    /// Children of `node`, in order
    pub fn children(&self, node: HostNodeId) -> Vec<HostNodeId> {
        self.state
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Parent of `node`, if attached
    pub fn parent(&self, node: HostNodeId) -> Option<HostNodeId> {
        self.state.borrow().nodes.get(node).and_then(|n| n.parent)
    }

    /// Tag name of an element node
    pub fn tag(&self, node: HostNodeId) -> Option<String> {
        match &self.state.borrow().nodes.get(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    /// Attribute value of an element node
    pub fn attribute(&self, node: HostNodeId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .nodes
            .get(node)?
            .attribute(name)
            .map(str::to_string)
    }

    /// Class list of an element node
    pub fn classes(&self, node: HostNodeId) -> Vec<String> {
        self.state
            .borrow()
            .nodes
            .get(node)
            .map(MemoryNode::classes)
            .unwrap_or_default()
    }

    /// Concatenated text of `node` and its descendants
    pub fn text_content(&self, node: HostNodeId) -> String {
        let mut out = String::new();
        self.state.borrow().collect_text(node, &mut out);
        out
    }

    /// Serialize `node` and its descendants
    pub fn to_html(&self, node: HostNodeId) -> String {
        let mut out = String::new();
        self.state.borrow().write_html(node, &mut out);
        out
    }

    /// First attached element whose `id` attribute equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<HostNodeId> {
        let state = self.state.borrow();
        state.find(state.root, &|node| node.attribute("id") == Some(id))
    }

    /// Number of listeners bound for `event` on `node`
    pub fn listener_count(&self, node: HostNodeId, event: &str) -> usize {
        match self.state.borrow().nodes.get(node).map(|n| &n.kind) {
            Some(NodeKind::Element { listeners, .. }) => {
                listeners.iter().filter(|(name, _)| name == event).count()
            }
            _ => 0,
        }
    }

    /// Stylesheet rules, in order
    pub fn rules(&self) -> Vec<String> {
        self.state.borrow().rules.clone()
    }

    /// Number of tree, attribute, and listener mutations performed so far
    pub fn mutation_count(&self) -> u64 {
        self.state.borrow().mutations
    }

    /// Number of connected size observers
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Number of timers that have not fired yet
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Current time of the manual clock
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Fire every listener bound for `event` on `node`; returns how many ran
    pub fn dispatch(&self, node: HostNodeId, event: &str) -> usize {
        let listeners: Vec<Listener> = match self.state.borrow().nodes.get(node).map(|n| &n.kind)
        {
            Some(NodeKind::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, listener)| listener.clone())
                .collect(),
            _ => Vec::new(),
        };

        let event = HostEvent {
            name: event.to_string(),
            target: node,
        };
        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    /// Give `node` a new size and report it to the node's observers
    pub fn resize(&self, node: HostNodeId, size: HostSize) {
        if let Some(entry) = self.state.borrow_mut().nodes.get_mut(node) {
            entry.size = size;
        }
        let callbacks: Vec<ResizeCallback> = self
            .state
            .borrow()
            .observers
            .values()
            .filter(|(observed, _)| *observed == node)
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Move the clock forward, running due timers in order
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.seq))
                    .map(|(index, _)| index);
                due.map(|index| {
                    let timer = state.timers.remove(index);
                    state.now = timer.due;
                    timer.task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }
}

/// Every `}` closes an open `{` and the rule ends at depth zero
fn braces_balanced(rule: &str) -> bool {
    let mut depth = 0usize;
    for c in rule.chars() {
        match c {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

impl Host for MemoryHost {
    fn create_element(&self, tag: &str) -> HostNodeId {
        self.insert_node(NodeKind::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
            listeners: Vec::new(),
        })
    }

    fn create_text(&self, text: &str) -> HostNodeId {
        self.insert_node(NodeKind::Text(text.to_string()))
    }

    fn create_fragment(&self) -> HostNodeId {
        self.insert_node(NodeKind::Fragment)
    }

    fn child_at(&self, parent: HostNodeId, index: usize) -> Option<HostNodeId> {
        self.state
            .borrow()
            .nodes
            .get(parent)?
            .children
            .get(index)
            .copied()
    }

    fn append(&self, parent: HostNodeId, child: HostNodeId) {
        if parent == child {
            return;
        }
        self.mutate(|state| {
            let nodes = state.take_insertable(child);
            state.adopt(parent, &nodes);
            if let Some(parent) = state.nodes.get_mut(parent) {
                parent.children.extend(nodes);
            }
        });
    }

    fn replace_with(&self, node: HostNodeId, replacement: HostNodeId) {
        if node == replacement {
            return;
        }
        self.mutate(|state| {
            if state.nodes.get(node).and_then(|n| n.parent).is_none() {
                return;
            }
            let nodes = state.take_insertable(replacement);
            let Some(parent) = state.nodes.get(node).and_then(|n| n.parent) else {
                return;
            };
            let Some(position) = state
                .nodes
                .get(parent)
                .and_then(|p| p.children.iter().position(|child| *child == node))
            else {
                return;
            };
            state.adopt(parent, &nodes);
            if let Some(parent) = state.nodes.get_mut(parent) {
                parent.children.splice(position..=position, nodes);
            }
            if let Some(node) = state.nodes.get_mut(node) {
                node.parent = None;
            }
        });
    }

    fn clear_content(&self, node: HostNodeId) {
        self.mutate(|state| {
            let children = state
                .nodes
                .get_mut(node)
                .map(|n| std::mem::take(&mut n.children))
                .unwrap_or_default();
            for child in children {
                if let Some(child) = state.nodes.get_mut(child) {
                    child.parent = None;
                }
            }
        });
    }

    fn mount(&self, node: HostNodeId) {
        let root = self.root();
        self.append(root, node);
    }

    fn set_attribute(&self, node: HostNodeId, name: &str, value: &str) {
        self.mutate(|state| {
            if let Some(node) = state.nodes.get_mut(node) {
                node.set_attribute(name, value);
            }
        });
    }

    fn contains_class(&self, node: HostNodeId, class: &str) -> bool {
        self.classes(node).iter().any(|existing| existing == class)
    }

    fn add_class(&self, node: HostNodeId, class: &str) {
        self.mutate(|state| {
            if let Some(node) = state.nodes.get_mut(node) {
                let mut classes = node.classes();
                if !classes.iter().any(|existing| existing == class) {
                    classes.push(class.to_string());
                    node.set_classes(&classes);
                }
            }
        });
    }

    fn replace_class(&self, node: HostNodeId, old: &str, new: &str) -> bool {
        self.mutate(|state| {
            let Some(node) = state.nodes.get_mut(node) else {
                return false;
            };
            let mut classes = node.classes();
            let Some(position) = classes.iter().position(|existing| existing == old) else {
                return false;
            };
            classes[position] = new.to_string();
            node.set_classes(&classes);
            true
        })
    }

    fn add_event_listener(&self, node: HostNodeId, event: &str, listener: &Listener) {
        self.mutate(|state| {
            if let Some(MemoryNode {
                kind: NodeKind::Element { listeners, .. },
                ..
            }) = state.nodes.get_mut(node)
            {
                let bound = listeners
                    .iter()
                    .any(|(name, existing)| name == event && Rc::ptr_eq(existing, listener));
                if !bound {
                    listeners.push((event.to_string(), listener.clone()));
                }
            }
        });
    }

    fn remove_event_listener(&self, node: HostNodeId, event: &str, listener: &Listener) {
        self.mutate(|state| {
            if let Some(MemoryNode {
                kind: NodeKind::Element { listeners, .. },
                ..
            }) = state.nodes.get_mut(node)
            {
                listeners.retain(|(name, existing)| !(name == event && Rc::ptr_eq(existing, listener)));
            }
        });
    }

    fn insert_rule(&self, rule: &str, index: usize) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        let len = state.rules.len();
        if index > len {
            return Err(PlatformError::RuleIndex { index, len });
        }
        let well_formed = rule
            .find('{')
            .is_some_and(|open| open > 0 && rule.trim_end().ends_with('}'))
            && braces_balanced(rule);
        if !well_formed {
            return Err(PlatformError::InvalidRule(rule.to_string()));
        }
        state.rules.insert(index, rule.to_string());
        Ok(index)
    }

    fn rule_count(&self) -> usize {
        self.state.borrow().rules.len()
    }

    fn clear_rules(&self) {
        self.state.borrow_mut().rules.clear();
    }

    fn size(&self, node: HostNodeId) -> HostSize {
        self.state
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.size)
            .unwrap_or_default()
    }

    fn observe_resize(&self, node: HostNodeId, callback: ResizeCallback) -> ObserverId {
        self.state.borrow_mut().observers.insert((node, callback))
    }

    fn disconnect(&self, observer: ObserverId) {
        self.state.borrow_mut().observers.remove(observer);
    }

    fn set_timeout(&self, delay: Duration, task: Task) {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.timers.push(Timer { due, seq, task });
    }
}
