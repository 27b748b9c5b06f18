//! # Source Span
//!
//! Positions and ranges in source text. Every token and CST node carries a
//! [`Span`] so later stages can point diagnostics back at the source.
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::Span;
//!
//! let span = Span::from_bytes(0, 8);
//! assert_eq!(span.len(), 8);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// POSITION
// =============================================================================

/// A point in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the source.
    pub byte: usize,
    /// Line (0-indexed).
    pub line: usize,
    /// Column in characters (0-indexed).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(byte: usize, line: usize, column: usize) -> Self {
        Self { byte, line, column }
    }
}

// =============================================================================
// SPAN
// =============================================================================

/// A half-open range `[start, end)` in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Span {
    /// Create a span from two positions.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from byte offsets on the first line.
    ///
    /// Mostly useful in tests where line information does not matter.
    pub const fn from_bytes(start: usize, end: usize) -> Self {
        Self {
            start: Position::new(start, 0, start),
            end: Position::new(end, 0, end),
        }
    }

    /// Empty span at the start of the source.
    pub const fn zero() -> Self {
        Self::from_bytes(0, 0)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.byte.saturating_sub(self.start.byte)
    }

    /// Returns true if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start.byte >= self.end.byte
    }

    /// Smallest span covering both spans.
    ///
    /// ## Example
    ///
    /// ```rust
    /// let merged = Span::from_bytes(0, 5).merge(&Span::from_bytes(10, 15));
    /// assert_eq!(merged, Span::from_bytes(0, 15));
    /// ```
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether the span contains a byte offset. The end is exclusive.
    pub fn contains(&self, byte: usize) -> bool {
        byte >= self.start.byte && byte < self.end.byte
    }

    /// The slice of `source` this span covers, if it is in bounds.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start.byte..self.end.byte)
    }
}

/// Anything that has a location in the source.
pub trait Spanned {
    /// Source span.
    fn span(&self) -> Span;
}

// =============================================================================
// TESTS
// =============================================================================
