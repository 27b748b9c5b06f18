//! # Tokens
//!
//! Token types for the BST lexer.
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::lexer::{Token, TokenKind};
//! use bst_parser::Span;
//!
//! let token = Token::new(TokenKind::Identifier, Span::from_bytes(0, 6), "author".to_string());
//! assert_eq!(token.text, "author");
//! ```

use crate::span::{Span, Spanned};
use tree_sitter_bst::Command;

// =============================================================================
// TOKEN
// =============================================================================

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token type.
    pub kind: TokenKind,
    /// Source span.
    pub span: Span,
    /// Token text exactly as written.
    pub text: String,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: String) -> Self {
        Self { kind, span, text }
    }

    /// Check if token is EOF.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Check if token is a lexical error.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

// =============================================================================
// TOKEN KIND
// =============================================================================

/// Types of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `'` introducing a quoted name.
    Quote,

    // Literals
    /// Integer literal like `#-12`, text includes the `#`.
    Integer,
    /// String literal like `"in "`, text includes the quotes.
    String,

    // Words
    /// Top-level command keyword, matched case-insensitively.
    Keyword(Command),
    /// One of `= < > + - * :=`.
    Operator,
    /// Word ending in `$`, like `write$` or `entry.max$`.
    Builtin,
    /// Any other word.
    Identifier,

    // Trivia
    /// `%` up to the end of the line.
    Comment,

    // Special
    /// Malformed input.
    Error(LexErrorKind),
    /// End of input.
    Eof,
}

/// Lexical error detected while scanning a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// String literal reaches a newline or end of input.
    UnterminatedString,
    /// `#` not followed by a well-formed 64-bit integer.
    InvalidInteger,
    /// Word starting with a character that cannot start a name.
    InvalidCharacter,
}

impl TokenKind {
    /// Check if this token is a literal value.
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Integer | Self::String)
    }

    /// Check if this token is a word that can follow a quote.
    pub const fn is_name(&self) -> bool {
        self.is_identifier() || matches!(self, Self::Builtin | Self::Operator)
    }

    /// Check if this token can name a user symbol.
    ///
    /// Command keywords live in their own namespace, so `read` or `sort`
    /// is an ordinary identifier wherever a name is expected.
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier | Self::Keyword(_))
    }

    /// Check if this token is a command keyword.
    pub const fn is_keyword(&self) -> bool {
        matches!(self, Self::Keyword(_))
    }

    /// Human-readable description used in error messages.
    pub const fn display(&self) -> &'static str {
        match self {
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Quote => "'''",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Keyword(cmd) => cmd.keyword(),
            Self::Operator => "operator",
            Self::Builtin => "built-in function",
            Self::Identifier => "identifier",
            Self::Comment => "comment",
            Self::Error(_) => "error",
            Self::Eof => "end of file",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_literal() {
        assert!(TokenKind::Integer.is_literal());
        assert!(TokenKind::String.is_literal());
        assert!(!TokenKind::Identifier.is_literal());
    }

    #[test]
    fn test_token_is_name() {
        assert!(TokenKind::Identifier.is_name());
        assert!(TokenKind::Builtin.is_name());
        assert!(TokenKind::Operator.is_name());
        assert!(TokenKind::Keyword(Command::Read).is_name());
        assert!(!TokenKind::Integer.is_name());
    }

    #[test]
    fn test_token_is_identifier() {
        assert!(TokenKind::Identifier.is_identifier());
        assert!(TokenKind::Keyword(Command::Sort).is_identifier());
        assert!(!TokenKind::Builtin.is_identifier());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TokenKind::LBrace.display(), "'{'");
        assert_eq!(TokenKind::Keyword(Command::Function).display(), "FUNCTION");
        assert_eq!(TokenKind::Eof.display(), "end of file");
    }

    #[test]
    fn test_token_is_error() {
        let token = Token::new(
            TokenKind::Error(LexErrorKind::InvalidInteger),
            Span::from_bytes(0, 1),
            "#".to_string(),
        );
        assert!(token.is_error());
        assert!(!token.is_eof());
    }
}
