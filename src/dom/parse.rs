//! `html5ever` → owned tree conversion.

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{Element, Node};

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Parse a complete HTML page and return its `<html>` element.
///
/// The HTML5 tree builder never fails: malformed markup is repaired the
/// way browsers repair it, so this always yields an element.
pub fn parse_html(html: &str) -> Element {
    let dom = html5ever::parse_document(RcDom::default(), parse_opts()).one(html);
    let children = convert_children(&dom.document);

    children
        .into_iter()
        .find_map(|node| match node {
            Node::Element(elem) if elem.is("html") => Some(elem),
            _ => None,
        })
        .unwrap_or_else(|| Element::new("html"))
}

/// Parse an HTML fragment in `<body>` context and return its top-level nodes.
pub(super) fn parse_fragment(html: &str) -> Vec<Node> {
    let context = QualName::new(None, Namespace::from(HTML_NS), LocalName::from("body"));
    let dom = html5ever::parse_fragment(RcDom::default(), parse_opts(), context, Vec::new()).one(html);

    // Fragment parsing wraps the result in a synthetic <html> element.
    convert_children(&dom.document)
        .into_iter()
        .find_map(|node| match node {
            Node::Element(elem) if elem.is("html") => Some(elem.children),
            _ => None,
        })
        .unwrap_or_default()
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            Some(Node::Element(Element {
                name: name.local.to_string(),
                attrs,
                children: convert_children(handle),
            }))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => None,
    }
}
