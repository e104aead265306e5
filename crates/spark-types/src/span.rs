use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location within one formula string.
///
/// Formulas are single-line strings typed into event-sheet fields, so a
/// span is a half-open byte range `start..end` into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a single position.
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Length of the spanned text in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no text.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let s = Span::point(5);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 5);
        assert!(s.is_empty());
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(3, 8);
        let b = Span::new(6, 14);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(3, 14));
    }

    #[test]
    fn test_span_merge_disjoint() {
        let a = Span::new(10, 12);
        let b = Span::new(0, 2);
        assert_eq!(a.merge(b), Span::new(0, 12));
    }

    #[test]
    fn test_span_len() {
        assert_eq!(Span::new(2, 7).len(), 5);
        assert_eq!(Span::point(4).len(), 0);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(7, 15)), "7");
    }
}
