//! Source positions for error attribution.
//!
//! Every syntax node carries a [`Span`]. The declaration pass attributes each
//! error to the span of the node it is visiting, and nodes built by drivers
//! without a source file use the unknown span, `Span::default()`.

use std::fmt;

/// Where a node starts in its source file, plus the length of its text.
///
/// Lines and columns count from 1. Line 0 marks a synthesized node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    /// Byte length of the node's text, 0 when unknown.
    pub len: u32,
}

impl Span {
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Whether this span points into a source file.
    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

/// `line:col`, or `<unknown>` for synthesized nodes.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.is_known() {
            true => write!(f, "{}:{}", self.line, self.col),
            false => f.write_str("<unknown>"),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_spans_render_line_and_column() {
        let span = Span::new(12, 3, 8);
        assert!(span.is_known());
        assert_eq!(span.to_string(), "12:3");
        assert_eq!(format!("{:?}", span), "12:3");
    }

    #[test]
    fn synthesized_spans_are_unknown() {
        let span = Span::default();
        assert!(!span.is_known());
        assert_eq!(span.to_string(), "<unknown>");
        // Length alone does not make a position.
        assert!(!Span::new(0, 4, 2).is_known());
    }
}
