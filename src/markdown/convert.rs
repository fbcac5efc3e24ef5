//! HTML tree → Markdown rendering.
//!
//! Rendering rules:
//!
//! | HTML                         | Markdown                              |
//! |------------------------------|---------------------------------------|
//! | `h1`..`h6`                   | ATX headings (`#` prefixes)           |
//! | `ul` / `ol`                  | `-` bullets / `1.` items              |
//! | `pre` (+ `code`)             | fenced block, `language-<X>` as tag   |
//! | `a`                          | `[text](resolved href)`               |
//! | `img`                        | `![alt](absolute src)`                |
//! | `table`                      | GFM table, first row as header        |
//! | `details` / `summary`        | raw `<details>` around Markdown body  |
//!
//! Underscores are never escaped; asterisks in prose are.

use crate::dom::{Document, Element, Node, language_hint};
use crate::pipeline::transform::link::PageAddress;
use crate::utils::html::{collapse_whitespace, is_block_element};

/// Converts cleaned documents of one page into raw (un-normalized) Markdown.
pub struct MarkdownConverter<'a> {
    address: &'a PageAddress,
}

impl<'a> MarkdownConverter<'a> {
    pub fn new(address: &'a PageAddress) -> Self {
        Self { address }
    }

    /// Render the whole document.
    pub fn convert(&self, doc: &Document) -> String {
        self.render_nodes(&doc.nodes, None)
    }

    // =========================================================================
    // Node dispatch
    // =========================================================================

    /// Render sibling nodes. `parent` is `None` at the document root.
    fn render_nodes(&self, nodes: &[Node], parent: Option<&Element>) -> String {
        let parent_is_block = parent.is_none_or(|p| is_block_element(&p.name));
        let mut out = String::new();

        for (i, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(text) => {
                    let prev = i.checked_sub(1).and_then(|j| nodes.get(j));
                    let next = nodes.get(i + 1);
                    let at_start = prev.map_or(parent_is_block, is_block_node);
                    let at_end = next.map_or(parent_is_block, is_block_node);

                    let mut text = collapse_whitespace(text).into_owned();
                    if at_start {
                        text = text.trim_start().to_string();
                    }
                    if at_end {
                        text.truncate(text.trim_end().len());
                    }
                    let after_break = prev
                        .and_then(Node::as_element)
                        .is_some_and(|e| e.is("br"));
                    let line_start = at_start || after_break;
                    push_inline(&mut out, &escape_text(&text, line_start));
                }
                // Trailing line breaks add nothing
                Node::Element(elem)
                    if elem.is("br") && nodes[i + 1..].iter().all(Node::is_blank_text) => {}
                Node::Element(elem) => push_inline(&mut out, &self.render_element(elem, parent)),
            }
        }
        out
    }

    fn render_element(&self, elem: &Element, parent: Option<&Element>) -> String {
        match elem.name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.render_heading(elem),
            "p" | "figcaption" => block(&self.render_nodes(&elem.children, Some(elem))),
            "br" => "\\\n".to_string(),
            "hr" => "\n\n---\n\n".to_string(),
            "strong" | "b" => self.wrap_inline(elem, "**"),
            "em" | "i" => self.wrap_inline(elem, "*"),
            "del" | "s" | "strike" => self.wrap_inline(elem, "~~"),
            "code" | "kbd" | "samp" => render_code_span(&elem.text_content()),
            "pre" => render_pre(elem, parent),
            "a" => self.render_link(elem),
            "img" => self.render_image(elem),
            "ul" => self.render_list(elem, false),
            "ol" => self.render_list(elem, true),
            "li" => {
                // Stray item outside a list
                let body = self.render_list_item(elem);
                format!("\n\n- {}\n\n", indent_continuation(&body, 2))
            }
            "blockquote" => self.render_blockquote(elem),
            "table" => self.render_table(elem),
            "details" => self.render_details(elem),
            "summary" if parent.is_some_and(|p| p.is("details")) => String::new(),
            "summary" | "dd" => block(&self.render_nodes(&elem.children, Some(elem))),
            "dt" => {
                let term = single_line(&self.render_nodes(&elem.children, Some(elem)));
                if term.is_empty() {
                    String::new()
                } else {
                    format!("\n\n**{term}**\n\n")
                }
            }
            "input" => match elem.attr("type") {
                Some("checkbox") if elem.attr("checked").is_some() => "[x] ".to_string(),
                Some("checkbox") => "[ ] ".to_string(),
                _ => String::new(),
            },
            "script" | "style" | "head" | "title" | "meta" | "link" | "template" => String::new(),
            name if is_block_element(name) => {
                format!("\n\n{}\n\n", self.render_nodes(&elem.children, Some(elem)))
            }
            _ => self.render_nodes(&elem.children, Some(elem)),
        }
    }

    // =========================================================================
    // Inline
    // =========================================================================

    /// Wrap inline content in `marker`, keeping surrounding whitespace outside.
    fn wrap_inline(&self, elem: &Element, marker: &str) -> String {
        let inner = self.render_nodes(&elem.children, Some(elem));
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            return inner;
        }

        let lead = &inner[..inner.len() - inner.trim_start().len()];
        let trail = &inner[inner.trim_end().len()..];
        format!("{lead}{marker}{trimmed}{marker}{trail}")
    }

    fn render_link(&self, elem: &Element) -> String {
        let text = self.render_nodes(&elem.children, Some(elem));
        let Some(href) = elem.attr("href").filter(|h| !h.trim().is_empty()) else {
            return text;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return text;
        }

        let href = href.trim();
        let resolved = self.address.resolve(href);
        let title = elem.attr("title").filter(|t| !t.is_empty());

        // Only links left untouched by resolution keep their text as the URL
        if title.is_none() && trimmed == href && resolved == href && is_autolinkable(href) {
            return format!("<{resolved}>");
        }

        let lead = &text[..text.len() - text.trim_start().len()];
        let trail = &text[text.trim_end().len()..];
        format!(
            "{lead}[{trimmed}]({}{}){trail}",
            link_destination(&resolved),
            link_title(title)
        )
    }

    fn render_image(&self, elem: &Element) -> String {
        let Some(src) = elem.attr("src").filter(|s| !s.is_empty()) else {
            return String::new();
        };
        let alt = collapse_whitespace(elem.attr("alt").unwrap_or_default()).into_owned();
        let src = self.address.resolve_asset(src.trim());
        let title = elem.attr("title").filter(|t| !t.is_empty());
        format!(
            "![{}]({}{})",
            alt.trim(),
            link_destination(&src),
            link_title(title)
        )
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    fn render_heading(&self, elem: &Element) -> String {
        let level = elem.name[1..].parse::<usize>().unwrap_or(1);
        let text = single_line(&self.render_nodes(&elem.children, Some(elem)));
        if text.is_empty() {
            return String::new();
        }
        format!("\n\n{} {}\n\n", "#".repeat(level), text)
    }

    fn render_list(&self, list: &Element, ordered: bool) -> String {
        let mut number = list
            .attr("start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);

        let mut out = String::from("\n\n");
        for item in list.child_elements().filter(|e| e.is("li")) {
            let marker = if ordered {
                format!("{number}. ")
            } else {
                "- ".to_string()
            };
            number += 1;

            let body = self.render_list_item(item);
            out.push_str(&marker);
            out.push_str(&indent_continuation(&body, marker.len()));
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Body of a list item, without marker or indentation.
    ///
    /// Items holding paragraphs stay loose; others are tightened so nested
    /// lists hang directly under their parent line.
    fn render_list_item(&self, item: &Element) -> String {
        let body = self.render_nodes(&item.children, Some(item));
        let body = body.trim();
        if item.child_elements().any(|e| e.is("p")) {
            body.to_string()
        } else {
            drop_blank_lines(body)
        }
    }

    fn render_blockquote(&self, elem: &Element) -> String {
        let body = self.render_nodes(&elem.children, Some(elem));
        let body = super::normalize::normalize(&body);
        let quoted: Vec<String> = body
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    }

    fn render_table(&self, table: &Element) -> String {
        let rows: Vec<Vec<String>> = table_rows(table)
            .into_iter()
            .map(|row| {
                row.child_elements()
                    .filter(|c| c.is("td") || c.is("th"))
                    .map(|cell| self.render_cell(cell))
                    .collect()
            })
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect();

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return String::new();
        }

        let format_row = |cells: &[String]| {
            let mut line = String::from("|");
            for i in 0..columns {
                line.push(' ');
                line.push_str(cells.get(i).map_or("", String::as_str));
                line.push_str(" |");
            }
            line
        };

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(format_row(&rows[0]));
        lines.push(format!("|{}", " --- |".repeat(columns)));
        lines.extend(rows[1..].iter().map(|row| format_row(row)));
        format!("\n\n{}\n\n", lines.join("\n"))
    }

    fn render_cell(&self, cell: &Element) -> String {
        single_line(&self.render_nodes(&cell.children, Some(cell))).replace('|', "\\|")
    }

    fn render_details(&self, details: &Element) -> String {
        let summary = details
            .child("summary")
            .map(|s| single_line(&self.render_nodes(&s.children, Some(s))))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Details".to_string());
        let body = self.render_nodes(&details.children, Some(details));
        format!(
            "\n\n<details>\n<summary>{summary}</summary>\n\n{}\n\n</details>\n\n",
            body.trim()
        )
    }
}

// =============================================================================
// Free-standing renderers
// =============================================================================

/// Render a `pre` block as a fenced code block.
///
/// The language comes from the `code` child's classes, then from the `pre`
/// itself; a bare `pre` looks at itself, then its parent.
fn render_pre(pre: &Element, parent: Option<&Element>) -> String {
    let code = pre.child("code");
    let lang = match code {
        Some(code) => language_hint(code, Some(pre)),
        None => language_hint(pre, parent),
    }
    .unwrap_or_default();

    let text = code.map_or_else(|| pre.text_content(), Element::text_content);
    let text = text.strip_suffix('\n').unwrap_or(&text);
    let fence = "`".repeat((longest_run(text, '`') + 1).max(3));

    format!("\n\n{fence}{lang}\n{text}\n{fence}\n\n")
}

/// Render an inline code span with a fence longer than any backtick run.
fn render_code_span(text: &str) -> String {
    let text = text.replace('\n', " ");
    if text.is_empty() {
        return String::new();
    }
    let fence = "`".repeat(longest_run(&text, '`') + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

/// Rows of a table, looking through `thead`/`tbody`/`tfoot`.
fn table_rows(table: &Element) -> Vec<&Element> {
    let mut rows = Vec::new();
    for child in table.child_elements() {
        match child.name.as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(child.child_elements().filter(|e| e.is("tr"))),
            _ => {}
        }
    }
    rows
}

// =============================================================================
// Helpers
// =============================================================================

/// Append a rendered piece without doubling the space between inline runs.
fn push_inline(out: &mut String, piece: &str) {
    if out.ends_with(' ') {
        out.push_str(piece.trim_start_matches(' '));
    } else {
        out.push_str(piece);
    }
}

#[inline]
fn is_block_node(node: &Node) -> bool {
    node.as_element().is_some_and(|e| is_block_element(&e.name))
}

/// Surround trimmed content with blank lines, or drop it when empty.
fn block(content: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else {
        format!("\n\n{content}\n\n")
    }
}

/// Fold rendered content onto one line (headings, table cells, terms).
fn single_line(s: &str) -> String {
    let s = s.replace("\\\n", " ").replace('\n', " ");
    collapse_whitespace(&s).trim().to_string()
}

/// Escape Markdown emphasis markers in prose. Underscores stay literal.
///
/// At the start of a line, markers that would open a heading, list,
/// quote or thematic break are escaped too.
fn escape_text(text: &str, line_start: bool) -> String {
    let text = text.replace('*', "\\*");
    if line_start {
        escape_block_marker(&text)
    } else {
        text
    }
}

fn escape_block_marker(text: &str) -> String {
    let body = text.trim_start();
    let lead = &text[..text.len() - body.len()];
    let bytes = body.as_bytes();
    let ends_marker = |i: usize| bytes.get(i).is_none_or(|b| *b == b' ' || *b == b'\t');

    let escape_at = match bytes.first() {
        Some(b'#') => {
            let hashes = bytes.iter().take_while(|b| **b == b'#').count();
            (hashes <= 6 && ends_marker(hashes)).then_some(0)
        }
        Some(b'>') => Some(0),
        Some(b'+' | b'-') if ends_marker(1) => Some(0),
        // Thematic break or setext underline
        Some(&c) if matches!(c, b'-' | b'_' | b'=') => body
            .trim_end()
            .bytes()
            .all(|b| b == c || b == b' ')
            .then_some(0),
        Some(b'0'..=b'9') => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            (digits <= 9 && matches!(bytes.get(digits), Some(b'.' | b')')) && ends_marker(digits + 1))
                .then_some(digits)
        }
        _ => None,
    };

    match escape_at {
        Some(i) => format!("{lead}{}\\{}", &body[..i], &body[i..]),
        None => text.to_string(),
    }
}

fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Indent every line after the first by `width` spaces (blank lines stay empty).
fn indent_continuation(body: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(body.len());
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}

/// Remove blank lines outside fenced code.
fn drop_blank_lines(body: &str) -> String {
    let mut fence = super::normalize::FenceTracker::default();
    body.lines()
        .filter(|line| fence.feed(line) || !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_autolinkable(url: &str) -> bool {
    url.contains("://") || url.starts_with("mailto:")
}

/// Wrap destinations containing spaces or parentheses in angle brackets.
fn link_destination(url: &str) -> String {
    if url.contains([' ', '(', ')']) {
        format!("<{url}>")
    } else {
        url.to_string()
    }
}

fn link_title(title: Option<&str>) -> String {
    title.map_or_else(String::new, |t| format!(" \"{}\"", t.replace('"', "\\\"")))
}

// =============================================================================
// Tests
// =============================================================================
