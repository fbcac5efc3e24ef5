//! Config field paths.

use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::fmt;

/// Path of a config field, as shown in diagnostics.
///
/// Top-level keys are static (`site_url`); entries of `[[sections]]` are
/// built at validation time (`sections[1].pages[0]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Cow<'static, str>);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Path of a field inside the `index`-th section.
    pub fn section(index: usize, field: &str) -> Self {
        Self(Cow::Owned(format!("sections[{index}].{field}")))
    }

    /// Path of the `entry`-th page of the `index`-th section.
    pub fn section_page(index: usize, entry: usize) -> Self {
        Self(Cow::Owned(format!("sections[{index}].pages[{entry}]")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
