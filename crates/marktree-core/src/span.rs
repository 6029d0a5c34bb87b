//! Byte ranges within parsed source text.
//!
//! Rules report their match and capture groups as `Span`s relative to the
//! text they inspected; the parser shifts them into absolute positions before
//! descending into an inner span.

/// A byte range in the source text.
///
/// Spans use byte offsets (not character offsets) so they can slice `&str`
/// directly. Both `start` and `end` are inclusive-exclusive: `[start, end)`.
///
/// # Example
///
/// ```rust
/// use marktree_core::span::Span;
///
/// let span = Span::new(2, 6);
/// assert_eq!(span.len(), 4);
/// assert_eq!(span.slice("**bold**"), "bold");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span from byte offsets.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span contains a byte offset.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Shift both ends of the span forward by `offset` bytes.
    #[inline]
    pub const fn offset(self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Restrict this span to lie within `bounds`.
    #[inline]
    pub fn clamp(self, bounds: Span) -> Span {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(start, bounds.end);
        Span { start, end }
    }

    /// Merge two spans into one covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Borrow the covered text out of `source`.
    ///
    /// Panics if the span is out of bounds or not on char boundaries, like
    /// ordinary string slicing.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_clamp() {
        let span = Span::new(1, 4).offset(10);
        assert_eq!(span, Span::new(11, 14));

        let bounds = Span::new(12, 20);
        assert_eq!(span.clamp(bounds), Span::new(12, 14));
        assert_eq!(Span::new(25, 30).clamp(bounds), Span::new(20, 20));
    }

    #[test]
    fn test_merge_and_contains() {
        let merged = Span::new(3, 5).merge(Span::new(0, 4));
        assert_eq!(merged, Span::new(0, 5));
        assert!(merged.contains(0));
        assert!(!merged.contains(5));
        assert!(Span::new(2, 2).is_empty());
    }
}
