//! Markdown normalization pass.
//!
//! Brings rendered Markdown into one canonical layout:
//!
//! - trailing whitespace trimmed, leading/trailing blank lines dropped
//! - runs of blank lines collapsed to one
//! - `*` / `+` bullets rewritten to `-`
//! - exactly one trailing newline
//!
//! Fenced code is copied through untouched. Lines are never wrapped.

use std::sync::LazyLock;

use regex::Regex;

/// Bullet marker at line start (after optional indentation).
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)[*+]([ \t])").expect("bullet pattern is valid")
});

/// Normalize a Markdown document.
pub fn normalize(markdown: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut fence = FenceTracker::default();
    let mut prev_blank = true;

    for line in markdown.lines() {
        if fence.is_open() {
            fence.feed(line);
            lines.push(line.to_string());
            prev_blank = false;
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            if !prev_blank {
                lines.push(String::new());
            }
            prev_blank = true;
            continue;
        }

        fence.feed(line);
        lines.push(BULLET.replace(line, "${1}-${2}").into_owned());
        prev_blank = false;
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// =============================================================================
// Fence tracking
// =============================================================================

/// Line-by-line tracker of fenced code blocks (```` ``` ```` or `~~~`).
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Advance over `line`. Returns whether the line belongs to a fenced
    /// block (opening fence, content or closing fence).
    pub fn feed(&mut self, line: &str) -> bool {
        match self.open {
            Some((ch, len)) => {
                if is_closing_fence(line, ch, len) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = opening_fence(line);
                self.open.is_some()
            }
        }
    }
}

fn opening_fence(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let ch = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    if len < 3 {
        return None;
    }
    // Backtick fences cannot carry backticks in their info string
    if ch == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some((ch, len))
}

fn is_closing_fence(line: &str, ch: char, len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= len && trimmed.chars().all(|c| c == ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalize("\n\n# A\n\n\n\nb  \n\n\n"), "# A\n\nb\n");
    }

    #[test]
    fn test_rewrites_bullets() {
        assert_eq!(normalize("* a\n  + b\n- c\n"), "- a\n  - b\n- c\n");
        // Escaped asterisks and emphasis are prose
        assert_eq!(normalize("\\* a\n*b*\n"), "\\* a\n*b*\n");
    }

    #[test]
    fn test_fences_untouched() {
        let md = "```py\n* x  \n\n\n\n+ y\n```\n\n\n* z\n";
        assert_eq!(normalize(md), "```py\n* x  \n\n\n\n+ y\n```\n\n- z\n");
    }

    #[test]
    fn test_longer_fence_not_closed_by_shorter() {
        let md = "````\n```\n\n\n````\n";
        assert_eq!(normalize(md), md);
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n \n\t\n"), "");
    }

    #[test]
    fn test_no_wrapping() {
        let long = "word ".repeat(100);
        assert_eq!(normalize(&long), format!("{}\n", long.trim_end()));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let md = "# T\n\n* a\n\n```\nx\n```\n";
        let once = normalize(md);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_fence_tracker() {
        let mut fence = FenceTracker::default();
        assert!(!fence.feed("text"));
        assert!(fence.feed("~~~"));
        assert!(fence.feed(""));
        assert!(fence.feed("~~~"));
        assert!(!fence.is_open());
    }
}
