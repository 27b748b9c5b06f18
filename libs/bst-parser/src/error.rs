//! # Parse Errors
//!
//! Error types for the BST parser.
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::error::ParseError;
//!
//! let error = ParseError::unexpected_token("}", "identifier");
//! assert!(error.to_string().contains("unexpected token '}'"));
//! ```

use crate::lexer::LexErrorKind;
use crate::span::Span;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind} at {}:{}", .span.start.line + 1, .span.start.column + 1)]
pub struct ParseError {
    /// Error kind with details.
    pub kind: ParseErrorKind,
    /// Source location of error.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create an unexpected token error with an empty span.
    pub fn unexpected_token(found: &str, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken {
                found: found.to_string(),
                expected: expected.to_string(),
            },
            Span::zero(),
        )
    }

    /// Create an unexpected end of file error with an empty span.
    pub fn unexpected_eof(expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            },
            Span::zero(),
        )
    }

    /// Convert a lexical error token into a parse error.
    pub fn lexical(kind: LexErrorKind, text: &str, span: Span) -> Self {
        let kind = match kind {
            LexErrorKind::UnterminatedString => ParseErrorKind::UnterminatedString,
            LexErrorKind::InvalidInteger => ParseErrorKind::InvalidInteger {
                text: text.to_string(),
            },
            LexErrorKind::InvalidCharacter => ParseErrorKind::InvalidCharacter {
                character: text.chars().next().unwrap_or_default(),
            },
        };
        Self::new(kind, span)
    }

    /// Replace the span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

// =============================================================================
// PARSE ERROR KIND
// =============================================================================

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// Found a token the grammar does not allow here.
    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken {
        /// Token that was found.
        found: String,
        /// Description of what was expected.
        expected: String,
    },

    /// Input ended inside a command.
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof {
        /// Description of what was expected.
        expected: String,
    },

    /// String literal not closed on the same line.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// Malformed integer literal.
    #[error("invalid integer literal '{text}'")]
    InvalidInteger {
        /// The invalid text.
        text: String,
    },

    /// Blocks nested deeper than the parser accepts.
    #[error("blocks nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting limit.
        limit: usize,
    },

    /// A name starts with a character names cannot start with.
    #[error("invalid character '{character}' at start of name")]
    InvalidCharacter {
        /// The offending character.
        character: char,
    },
}

// =============================================================================
// TESTS
// =============================================================================
