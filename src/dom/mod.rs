//! Owned HTML document tree.
//!
//! Pages are parsed once with `html5ever` and converted into this plain
//! tree, which every pipeline stage owns exclusively:
//!
//! ```text
//! &str ──parse──▶ Document ──clean──▶ Document ──hook──▶ Document ──convert──▶ Markdown
//! ```
//!
//! Comments, doctypes and processing instructions are dropped during parsing.

mod parse;
mod serialize;

pub use parse::parse_html;

use std::fmt;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Borrow as element, if this node is one.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(elem) => Some(elem),
            Self::Text(_) => None,
        }
    }

    /// Mutably borrow as element, if this node is one.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(elem) => Some(elem),
            Self::Text(_) => None,
        }
    }

    /// Whether this is an element with the given tag name.
    #[inline]
    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|e| e.is(name))
    }

    /// Whether this is a text node containing only whitespace.
    #[inline]
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Element(elem) => elem.text_content(),
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Self::Element(elem)
    }
}

/// An HTML element with lowercase tag name, attributes in source order and
/// owned children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child node.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.is(name))
    }

    /// First descendant element (depth-first, pre-order) matching `pred`.
    pub fn find(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        find_in(&self.children, pred)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

/// A parsed HTML fragment: the top-level nodes of a page's content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Parse an HTML fragment (page content, no `<html>`/`<body>` needed).
    pub fn parse(html: &str) -> Self {
        Self::new(parse::parse_fragment(html))
    }

    /// First element (depth-first, pre-order) matching `pred`.
    pub fn find(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        find_in(&self.nodes, pred)
    }

    /// Serialize back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize::write_nodes(&self.nodes, &mut out);
        out
    }

    /// Concatenated text of the whole document.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn find_in<'a>(nodes: &'a [Node], pred: &impl Fn(&Element) -> bool) -> Option<&'a Element> {
    nodes.iter().filter_map(Node::as_element).find_map(|elem| {
        if pred(elem) {
            Some(elem)
        } else {
            find_in(&elem.children, pred)
        }
    })
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(elem) => collect_text(&elem.children, out),
        }
    }
}

// =============================================================================
// Code language hints
// =============================================================================

/// Find a `language-<X>` class on `elem` or, failing that, on `parent`.
///
/// Returns `<X>`, or `None` when neither carries a hint.
pub fn language_hint<'a>(elem: &'a Element, parent: Option<&'a Element>) -> Option<&'a str> {
    elem.classes()
        .chain(parent.into_iter().flat_map(Element::classes))
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_attrs() {
        let mut elem = Element::new("a").with_attr("href", "x");
        assert_eq!(elem.attr("href"), Some("x"));
        elem.set_attr("href", "y");
        assert_eq!(elem.attr("href"), Some("y"));
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.attr("title"), None);
    }

    #[test]
    fn test_classes() {
        let elem = Element::new("code").with_attr("class", " language-rust  highlight ");
        assert!(elem.has_class("highlight"));
        assert_eq!(elem.classes().count(), 2);
        assert!(!Element::new("p").has_class("x"));
    }

    #[test]
    fn test_language_hint_own_class_first() {
        let pre = Element::new("pre").with_attr("class", "language-text");
        let code = Element::new("code").with_attr("class", "language-python");
        assert_eq!(language_hint(&code, Some(&pre)), Some("python"));
    }

    #[test]
    fn test_language_hint_parent_fallback() {
        let pre = Element::new("div").with_attr("class", "highlight language-toml");
        let code = Element::new("code");
        assert_eq!(language_hint(&code, Some(&pre)), Some("toml"));
        assert_eq!(language_hint(&code, None), None);
    }

    #[test]
    fn test_find_and_text() {
        let doc = Document::new(vec![
            Element::new("div")
                .with_child(Element::new("p").with_text("hello "))
                .with_child(Element::new("h1").with_text("Title"))
                .into(),
            Node::Text("tail".into()),
        ]);
        let h1 = doc.find(&|e| e.is("h1")).map(Element::text_content);
        assert_eq!(h1.as_deref(), Some("Title"));
        assert_eq!(doc.text_content(), "hello Titletail");
    }
}
