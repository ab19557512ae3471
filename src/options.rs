//! Configuration options for reading and writing records.
//!
//! - [`Options`]: indentation unit, nesting guard and zero-fill of missing
//!   fields
//!
//! ## Examples
//!
//! ```rust
//! use yaml_records::{to_string_with_options, Options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Inner { x: i32 }
//!
//! #[derive(Serialize)]
//! struct Outer { inner: Inner }
//!
//! let options = Options::new().with_indent(4);
//! let text = to_string_with_options(&Outer { inner: Inner { x: 1 } }, &options).unwrap();
//! assert_eq!(text, "inner:\n    x: 1");
//! ```

/// Characters that force a scalar to be written double-quoted.
pub const SPECIAL_CHARACTERS: &[char] = &[':', '"', '\'', '\n', '\r', '\t', '[', ']', '{', '}', '#'];

/// Default width of one indentation level, in spaces.
pub const DEFAULT_INDENT: usize = 2;

/// Default nesting limit enforced while building the tree.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options shared by the parser and the serializer.
///
/// The indentation unit must match between writing and reading a document:
/// the parser expects every nested block one unit deeper than its parent,
/// and each leading tab expands to exactly one unit.
///
/// # Examples
///
/// ```rust
/// use yaml_records::Options;
///
/// let options = Options::new();
/// assert_eq!(options.indent, 2);
///
/// let options = Options::new().with_indent(4).with_max_depth(16);
/// assert_eq!(options.indent, 4);
/// assert_eq!(options.max_depth, 16);
/// assert!(!options.zero_fill);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub indent: usize,
    pub max_depth: usize,
    /// Missing struct fields read as the absent marker instead of failing.
    pub zero_fill: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            indent: DEFAULT_INDENT,
            max_depth: DEFAULT_MAX_DEPTH,
            zero_fill: false,
        }
    }
}

impl Options {
    /// Creates default options (2-space indentation, depth limit of 128).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation unit (number of spaces per level).
    ///
    /// A width of zero is raised to one.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Sets the maximum nesting depth accepted by the parser.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Gives every struct field missing from its mapping the zero value of
    /// its type, as if it were written as a bare `key:`.
    ///
    /// This applies to all fields, so it also replaces `#[serde(default)]`
    /// values. Writing is unaffected.
    #[must_use]
    pub fn with_zero_fill(mut self, zero_fill: bool) -> Self {
        self.zero_fill = zero_fill;
        self
    }

    pub(crate) fn indent_str(&self, level: usize) -> String {
        " ".repeat(self.indent * level)
    }
}
