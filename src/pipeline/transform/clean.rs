//! Structural cleaning (Document → Document).
//!
//! Strips site chrome that carries no documentation value and folds
//! structural patterns into their semantic equivalent:
//!
//! 1. Remove chrome: navigation, search boxes, edit/copy buttons, permalinks
//! 2. Fold line-number/code tables into `<details>` (see [`super::source`])
//! 3. Flatten highlighted code so `pre`/`code` hold plain text
//!
//! Every step is a no-op on input it does not recognize, so cleaning an
//! already-clean document changes nothing.

use crate::dom::{Document, Element, Node};

use super::source::fold_source_tables;

/// Tags that never carry documentation content.
const CHROME_TAGS: &[&str] = &[
    "button", "form", "nav", "noscript", "script", "style", "template",
];

/// ARIA roles of chrome regions.
const CHROME_ROLES: &[&str] = &["navigation", "search"];

/// Classes used by documentation themes for chrome widgets.
const CHROME_CLASSES: &[&str] = &[
    "copy-button",
    "doc-symbol",
    "edit-this-page",
    "headerlink",
    "md-clipboard",
    "md-content__button",
    "md-footer",
    "md-header",
    "md-nav",
    "md-search",
    "md-sidebar",
    "md-source-file",
    "search-placeholder",
    "toc",
];

/// Link titles of edit/view-source widgets.
const CHROME_LINK_TITLES: &[&str] = &["Edit this page", "View source of this page"];

/// Clean a document in place.
pub fn clean(doc: &mut Document) {
    remove_chrome(&mut doc.nodes);
    fold_source_tables(&mut doc.nodes);
    flatten_code(&mut doc.nodes);
}

// =============================================================================
// Chrome Removal
// =============================================================================

/// Whether an element is site chrome.
fn is_chrome(elem: &Element) -> bool {
    if CHROME_TAGS.contains(&elem.name.as_str()) {
        return true;
    }
    if elem
        .attr("role")
        .is_some_and(|role| CHROME_ROLES.contains(&role))
    {
        return true;
    }
    if elem.classes().any(|class| CHROME_CLASSES.contains(&class)) {
        return true;
    }
    // Inline line numbers (`<span class="linenos">`) inside highlighted code
    if elem.is("span") && elem.has_class("linenos") {
        return true;
    }
    elem.is("a")
        && elem
            .attr("title")
            .is_some_and(|title| CHROME_LINK_TITLES.contains(&title))
}

fn remove_chrome(nodes: &mut Vec<Node>) {
    nodes.retain(|node| !node.as_element().is_some_and(is_chrome));
    for node in nodes.iter_mut() {
        if let Node::Element(elem) = node {
            remove_chrome(&mut elem.children);
        }
    }
}

// =============================================================================
// Code Flattening
// =============================================================================

/// Replace the highlighter markup inside `pre` blocks with plain text.
///
/// A `pre` wrapping a single `code` keeps the `code` element (it carries the
/// language class), but its children become one text node.
fn flatten_code(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        let Node::Element(elem) = node else {
            continue;
        };

        if elem.is("pre") {
            flatten_pre(elem);
        } else {
            flatten_code(&mut elem.children);
        }
    }
}

fn flatten_pre(pre: &mut Element) {
    let single_code = {
        let mut significant = pre.children.iter().filter(|n| !n.is_blank_text());
        matches!(
            (significant.next(), significant.next()),
            (Some(node), None) if node.is_element("code")
        )
    };

    if single_code {
        pre.children.retain(|n| !n.is_blank_text());
        if let Some(code) = pre.children.first_mut().and_then(Node::as_element_mut) {
            let text = code.text_content();
            code.children = vec![Node::Text(text)];
        }
    } else {
        let text = pre.text_content();
        pre.children = vec![Node::Text(text)];
    }
}

// =============================================================================
// Tests
// =============================================================================
