//! Arena document model for a rendered page.
//!
//! # Responsibility
//! - Own every node of the page (elements and text) in one arena.
//! - Expose the class-list, attribute, inline-style, form-value and layout
//!   surface that interaction handlers read and mutate.
//!
//! # Invariants
//! - `NodeId`s are never reused; detached nodes stay in the arena.
//! - A node has at most one parent and appears once in its parent's children.
//! - Class lists hold no duplicates and preserve insertion order.
//! - Query results are in document (pre-order) order.

pub mod fragment;
pub mod selector;
pub mod style;

use fragment::{escape_html, parse_fragment, FragmentNode, MarkupError};
use selector::SelectorList;
use std::collections::BTreeMap;
use style::InlineStyle;

/// Stable handle to one node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index, mostly useful in diagnostics.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Document-relative layout box (vertical axis only).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    /// Distance from the top of the document, in CSS pixels.
    pub top: f64,
    /// Rendered height, in CSS pixels.
    pub height: f64,
}

/// Viewport-relative bounding rectangle (vertical axis only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: InlineStyle,
    value: String,
    default_value: String,
    layout: Option<LayoutBox>,
}

const FORM_FIELD_TAGS: &[&str] = &["input", "textarea", "select"];

/// Page document: an arena of nodes rooted at a document node with one `body`.
///
/// The arena only grows: every created node keeps its slot for the
/// document's lifetime, including toast nodes detached after their exit.
/// A long session grows by a couple of nodes per toast and a few per submitted
/// testimonial card. [`Document::node_count`] reports the arena size.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document holding only `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            root: NodeId(0),
            body: NodeId(0),
            focused: None,
        };
        let body = doc.create_element("body");
        doc.append_child(doc.root, body);
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Arena size, attached and detached nodes alike.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Creates a detached element. Tag names are stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        }))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Appends `child` as the last child of `parent`, detaching it first.
    ///
    /// Appending a node under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        if parent == child || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Removes `child` from `parent`. Returns `false` when it is not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Detaches `node` from its parent, if any.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|c| *c != node);
        self.nodes[node.0].parent = None;
        if self.focused.is_some_and(|f| f == node || self.is_ancestor(node, f)) {
            self.focused = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children only.
    pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Returns whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Returns whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.is_ancestor(self.root, node)
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    /// Attribute lookup. The class list is exposed through the class methods.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "class" {
            self.set_class_name(node, value);
            return;
        }
        if let Some(element) = self.element_mut(node) {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attrs.remove(name);
        }
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Flips `class` and returns whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    /// Replaces the whole class list from a whitespace-separated string.
    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.clear();
        }
        for class in class_name.split_whitespace() {
            self.add_class(node, class);
        }
    }

    pub fn class_name(&self, node: NodeId) -> String {
        self.classes(node).join(" ")
    }

    pub fn style(&self, node: NodeId) -> Option<&InlineStyle> {
        self.element(node).map(|e| &e.style)
    }

    pub fn style_value(&self, node: NodeId, property: &str) -> Option<&str> {
        self.style(node)?.get(property)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.style.set(property, value);
        }
    }

    pub fn set_css_text(&mut self, node: NodeId, css_text: &str) {
        if let Some(element) = self.element_mut(node) {
            element.style.set_css_text(css_text);
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(Node {
            data: NodeData::Text(text),
            ..
        }) = self.node(node)
        {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|d| match &self.nodes[d.0].data {
                NodeData::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replaces all children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if !self.is_element(node) {
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node).to_vec() {
            self.detach(child);
        }
    }

    /// Replaces the children of `node` with nodes parsed from `markup`.
    ///
    /// On parse failure the existing children are left untouched.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<(), MarkupError> {
        if !self.is_element(node) {
            return Ok(());
        }
        let fragment = parse_fragment(markup)?;
        self.clear_children(node);
        for item in &fragment {
            let child = self.build_fragment(item);
            self.append_child(node, child);
        }
        Ok(())
    }

    fn build_fragment(&mut self, item: &FragmentNode) -> NodeId {
        match item {
            FragmentNode::Text(text) => self.create_text(text),
            FragmentNode::Element {
                tag,
                attrs,
                children,
            } => {
                let element = self.create_element(tag);
                for (name, value) in attrs {
                    self.set_attr(element, name, value);
                }
                for child in children {
                    let built = self.build_fragment(child);
                    self.append_child(element, built);
                }
                element
            }
        }
    }

    /// Serializes `node` and its subtree, escaping text and attribute values.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    /// Serializes the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.node(node) else {
            return;
        };
        match &entry.data {
            NodeData::Text(text) => out.push_str(&escape_html(text)),
            NodeData::Document => {
                for child in &entry.children {
                    self.write_html(*child, out);
                }
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                if !element.classes.is_empty() {
                    out.push_str(&format!(
                        " class=\"{}\"",
                        escape_html(&element.classes.join(" "))
                    ));
                }
                for (name, value) in &element.attrs {
                    out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
                }
                if !element.style.is_empty() {
                    out.push_str(&format!(
                        " style=\"{}\"",
                        escape_html(&element.style.css_text())
                    ));
                }
                out.push('>');
                if fragment::is_void_tag(&element.tag) {
                    return;
                }
                for child in &entry.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.value.as_str())
    }

    /// Sets the live value of a form field (what a user types).
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = value.to_string();
        }
    }

    /// Sets both the default and live value, as markup does.
    pub fn set_default_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.default_value = value.to_string();
            element.value = value.to_string();
        }
    }

    pub fn is_form_field(&self, node: NodeId) -> bool {
        self.tag(node)
            .is_some_and(|tag| FORM_FIELD_TAGS.contains(&tag))
    }

    /// Form fields under `form` in document order.
    pub fn form_fields(&self, form: NodeId) -> Vec<NodeId> {
        self.descendants(form)
            .into_iter()
            .filter(|d| self.is_form_field(*d))
            .collect()
    }

    /// Restores every field under `form` to its default value.
    pub fn reset_form(&mut self, form: NodeId) {
        for field in self.form_fields(form) {
            if let Some(element) = self.element_mut(field) {
                element.value = element.default_value.clone();
            }
        }
    }

    pub fn layout(&self, node: NodeId) -> Option<LayoutBox> {
        self.element(node)?.layout
    }

    pub fn set_layout(&mut self, node: NodeId, layout: LayoutBox) {
        if let Some(element) = self.element_mut(node) {
            element.layout = Some(layout);
        }
    }

    /// Document-relative top; nodes without a layout box sit at 0.
    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.layout(node).map(|l| l.top).unwrap_or(0.0)
    }

    /// Rendered height rounded to whole pixels, like `offsetHeight`.
    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.layout(node).map(|l| l.height.round()).unwrap_or(0.0)
    }

    /// Bounding rectangle relative to a viewport scrolled to `scroll_y`.
    pub fn bounding_rect(&self, node: NodeId, scroll_y: f64) -> Rect {
        let layout = self.layout(node).unwrap_or_default();
        let top = layout.top - scroll_y;
        Rect {
            top,
            bottom: top + layout.height,
        }
    }

    /// Lowest layout edge in the document; the scrollable height.
    pub fn scroll_height(&self) -> f64 {
        self.descendants(self.root)
            .into_iter()
            .filter_map(|n| self.layout(n))
            .map(|l| l.top + l.height)
            .fold(0.0, f64::max)
    }

    pub fn matches(&self, node: NodeId, selector: &SelectorList) -> bool {
        self.element(node).is_some() && selector.matches(self, node)
    }

    /// Connected elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    pub fn query(&self, selector: &SelectorList) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.matches(*n, selector))
    }

    /// Parses `selector` and returns the first match; `None` when the selector
    /// is invalid or nothing matches.
    pub fn query_str(&self, selector: &str) -> Option<NodeId> {
        SelectorList::parse(selector)
            .ok()
            .and_then(|parsed| self.query(&parsed))
    }

    /// Like [`Document::query_str`] for every match.
    pub fn query_all_str(&self, selector: &str) -> Vec<NodeId> {
        SelectorList::parse(selector)
            .map(|parsed| self.query_all(&parsed))
            .unwrap_or_default()
    }

    /// First connected element whose `id` equals `id` exactly.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.id(*n) == Some(id))
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &SelectorList) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.matches(current, selector) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub fn focus(&mut self, node: NodeId) {
        if self.is_element(node) && self.is_connected(node) {
            self.focused = Some(node);
        }
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }
}
