//! Source-code table folding.
//!
//! Syntax highlighters with line numbers render code as a two-column table:
//!
//! ```html
//! <table class="highlighttable"><tr>
//!   <td class="linenos"><pre>1\n2</pre></td>
//!   <td class="code"><pre><code class="language-python">...</code></pre></td>
//! </tr></table>
//! ```
//!
//! Converted naively this becomes a Markdown table of line numbers. The
//! table is replaced by a collapsible block holding only the code:
//!
//! ```html
//! <details><summary>Source code</summary>
//!   <pre><code class="language-python">...</code></pre>
//! </details>
//! ```

use crate::dom::{Element, Node, language_hint};

/// Label of the collapsible block replacing a source table.
pub const SOURCE_SUMMARY: &str = "Source code";

/// Replace every line-number/code table under `nodes`, at any depth.
pub fn fold_source_tables(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        let Node::Element(elem) = node else {
            continue;
        };

        if let Some(details) = source_details(elem) {
            *node = details.into();
        } else {
            fold_source_tables(&mut elem.children);
        }
    }
}

/// Build the `<details>` replacement if `table` is a source table.
fn source_details(table: &Element) -> Option<Element> {
    if !table.is("table") {
        return None;
    }

    let cells = table_cells(table);
    let has_linenos = cells.iter().any(|td| td.has_class("linenos"));
    if !table.has_class("highlighttable") && !has_linenos {
        return None;
    }

    let code_cell = cells
        .iter()
        .find(|td| td.has_class("code"))
        .or_else(|| cells.iter().rfind(|td| !td.has_class("linenos")))?;

    let (text, lang) = extract_code(code_cell);

    let mut code = Element::new("code").with_text(text);
    if let Some(lang) = lang {
        code.set_attr("class", format!("language-{lang}"));
    }

    Some(
        Element::new("details")
            .with_child(Element::new("summary").with_text(SOURCE_SUMMARY))
            .with_child(Element::new("pre").with_child(code)),
    )
}

/// Cells of the table's rows, looking through `thead`/`tbody`/`tfoot`.
fn table_cells(table: &Element) -> Vec<&Element> {
    let mut cells = Vec::new();
    for child in table.child_elements() {
        let rows: Vec<&Element> = match child.name.as_str() {
            "tr" => vec![child],
            "thead" | "tbody" | "tfoot" => child.child_elements().filter(|e| e.is("tr")).collect(),
            _ => continue,
        };
        for row in rows {
            cells.extend(row.child_elements().filter(|e| e.is("td") || e.is("th")));
        }
    }
    cells
}

/// Code text and language hint of a code cell.
///
/// The hint is looked up on the `code` element first, then on its parent
/// (`pre`); without a `code` element, on `pre` and then the cell itself.
fn extract_code(cell: &Element) -> (String, Option<String>) {
    if let Some((code, parent)) = find_with_parent(cell, "code") {
        let lang = language_hint(code, Some(parent)).map(str::to_string);
        return (code.text_content(), lang);
    }
    if let Some(pre) = cell.find(&|e| e.is("pre")) {
        let lang = language_hint(pre, Some(cell)).map(str::to_string);
        return (pre.text_content(), lang);
    }
    (cell.text_content(), language_hint(cell, None).map(str::to_string))
}

/// First descendant named `name`, together with its parent element.
fn find_with_parent<'a>(parent: &'a Element, name: &str) -> Option<(&'a Element, &'a Element)> {
    parent.child_elements().find_map(|child| {
        if child.is(name) {
            Some((child, parent))
        } else {
            find_with_parent(child, name)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    const SOURCE_TABLE: &str = r#"
    <div>
        <h3>Some function</h3>
        <table class="highlighttable">
            <tr>
                <td class="linenos"><pre>1
2
3</pre></td>
                <td class="code">
                    <pre><code class="language-python">def example_function():
    # This is an example function
    return "Hello, World!"</code></pre>
                </td>
            </tr>
        </table>
    </div>
    "#;

    #[test]
    fn test_transform_source_to_details() {
        let mut doc = Document::parse(SOURCE_TABLE);
        fold_source_tables(&mut doc.nodes);

        assert!(doc.find(&|e| e.is("table")).is_none());
        let details = doc.find(&|e| e.is("details")).expect("details block");
        let summary = details.child("summary").map(Element::text_content);
        assert_eq!(summary.as_deref(), Some(SOURCE_SUMMARY));

        let code = details.find(&|e| e.is("code")).expect("code element");
        assert_eq!(code.attr("class"), Some("language-python"));
        assert!(code.text_content().starts_with("def example_function():"));
        // Line numbers are gone
        assert!(!details.text_content().contains("1\n2\n3"));
    }

    #[test]
    fn test_language_from_pre() {
        let mut doc = Document::parse(
            r#"<table><tbody><tr><td class="linenos">1</td><td><pre class="language-rust"><code>fn main() {}</code></pre></td></tr></tbody></table>"#,
        );
        fold_source_tables(&mut doc.nodes);
        let code = doc.find(&|e| e.is("code")).expect("code element");
        assert_eq!(code.attr("class"), Some("language-rust"));
        assert_eq!(code.text_content(), "fn main() {}");
    }

    #[test]
    fn test_no_language_hint() {
        let mut doc = Document::parse(
            r#"<table class="highlighttable"><tr><td class="linenos">1</td><td class="code"><pre><code>x = 1</code></pre></td></tr></table>"#,
        );
        fold_source_tables(&mut doc.nodes);
        let code = doc.find(&|e| e.is("code")).expect("code element");
        assert_eq!(code.attr("class"), None);
    }

    #[test]
    fn test_regular_tables_untouched() {
        let html = "<table><tr><th>a</th></tr><tr><td>1</td></tr></table>";
        let mut doc = Document::parse(html);
        let before = doc.clone();
        fold_source_tables(&mut doc.nodes);
        assert_eq!(doc, before);
    }
}
