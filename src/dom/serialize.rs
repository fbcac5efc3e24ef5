//! Owned tree → HTML serialization.
//!
//! Used to hand documents to external pre-processing hooks. The output is
//! re-parsed on the way back, so it only needs to round-trip through an
//! HTML5 parser, not match the original bytes.

use super::{Element, Node};
use crate::utils::html::{escape, escape_attr, is_void_element};

/// Raw text elements: content is written without escaping.
#[inline]
fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

pub(super) fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Element(elem) => write_element(elem, out),
        }
    }
}

fn write_element(elem: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&elem.name);
    for (name, value) in &elem.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if is_void_element(&elem.name) {
        return;
    }

    if is_raw_text_element(&elem.name) {
        out.push_str(&elem.text_content());
    } else {
        write_nodes(&elem.children, out);
    }

    out.push_str("</");
    out.push_str(&elem.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use crate::dom::{Document, Element};

    #[test]
    fn test_serialize_basic() {
        let doc = Document::new(vec![
            Element::new("p")
                .with_attr("class", "a\"b")
                .with_text("x < y & z")
                .with_child(Element::new("br"))
                .into(),
        ]);
        assert_eq!(doc.to_html(), "<p class=\"a&quot;b\">x &lt; y &amp; z<br></p>");
    }

    #[test]
    fn test_serialize_round_trip() {
        let html = "<div class=\"x\"><p>a <code>b_c</code></p><pre><code>if a &lt; b {}</code></pre></div>";
        let doc = Document::parse(html);
        assert_eq!(Document::parse(&doc.to_html()), doc);
    }

    #[test]
    fn test_serialize_raw_text() {
        let doc = Document::parse("<script>if (a < b) {}</script>");
        assert_eq!(doc.to_html(), "<script>if (a < b) {}</script>");
    }
}
