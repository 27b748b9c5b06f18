//! # BST Parser
//!
//! Recursive descent parser for BibTeX style files.
//! Produces a Concrete Syntax Tree (CST).
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::lexer::Lexer;
//! use bst_parser::parser::Parser;
//!
//! let source = "EXECUTE {begin.bib}";
//! let tokens = Lexer::new(source).tokenize();
//! let cst = Parser::new(source, tokens).parse();
//! assert!(cst.is_ok());
//! ```

mod blocks;
mod commands;

use crate::cst::{Cst, CstNode, NodeKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::span::{Position, Span};

// =============================================================================
// PARSER
// =============================================================================

/// Recursive descent parser for BST.
pub struct Parser<'a> {
    /// Source text, sliced into `ERROR` nodes.
    source: &'a str,
    /// Token stream, ending with EOF.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// Nesting of the block being parsed.
    depth: usize,
    /// Collected parse errors.
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    ///
    /// ## Parameters
    ///
    /// - `source`: Original source text
    /// - `tokens`: Tokens from the lexer
    pub fn new(source: &'a str, mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| !t.is_eof()) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end), String::new()));
        }
        Self {
            source,
            tokens,
            current: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire source into a CST.
    ///
    /// Never fails: syntax errors are collected in [`Cst::errors`] and the
    /// input they cover ends up in `ERROR` nodes.
    pub fn parse(&mut self) -> Cst {
        let start = Position::default();
        let mut children = Vec::new();

        while !self.is_at_end() {
            let first = self.current;
            let command_start = self.current_position();
            match self.parse_command() {
                Ok(node) => children.push(node),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize(first);
                    children.push(self.error_node(command_start));
                }
            }
        }

        let end = self.peek().span.end;
        let root = CstNode::with_children(NodeKind::SourceFile, Span::new(start, end), children);

        tracing::trace!(
            commands = root.children.len(),
            errors = self.errors.len(),
            "parsed source"
        );

        Cst::new(root, std::mem::take(&mut self.errors))
    }

    // =========================================================================
    // TOKEN ACCESS
    // =========================================================================

    /// Get current token.
    fn peek(&self) -> &Token {
        // `new` guarantees a trailing EOF token.
        let index = self.current.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Get current token kind.
    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Check if current token matches kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Check if at end of file.
    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// Get current position.
    fn current_position(&self) -> Position {
        self.peek().span.start
    }

    /// Advance to next token.
    ///
    /// ## Returns
    ///
    /// The token that was consumed
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Get previous token.
    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Consume a token of the given kind as an anonymous leaf node.
    fn expect_leaf(&mut self, kind: TokenKind, node: NodeKind) -> Result<CstNode, ParseError> {
        if self.check(kind) {
            Ok(self.leaf(node))
        } else {
            Err(self.error_here(kind.display()))
        }
    }

    /// Consume an identifier, or a command keyword used as one, as an `id`.
    fn expect_id(&mut self) -> Result<CstNode, ParseError> {
        if self.peek_kind().is_identifier() {
            Ok(self.leaf(NodeKind::Id))
        } else {
            Err(self.error_here(TokenKind::Identifier.display()))
        }
    }

    /// Consume the current token as a leaf node with its text.
    fn leaf(&mut self, kind: NodeKind) -> CstNode {
        let token = self.advance();
        CstNode::with_text(kind, token.span, token.text.clone())
    }

    /// Consume comments, appending them to `children`.
    fn comments(&mut self, children: &mut Vec<CstNode>) {
        while self.check(TokenKind::Comment) {
            children.push(self.leaf(NodeKind::Comment));
        }
    }

    // =========================================================================
    // ERROR RECOVERY
    // =========================================================================

    /// Build the error for the current token, given what was expected.
    fn error_here(&self, expected: &str) -> ParseError {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof => ParseError::unexpected_eof(expected).with_span(token.span),
            TokenKind::Error(kind) => ParseError::lexical(kind, &token.text, token.span),
            _ => ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    found: token.text.clone(),
                    expected: expected.to_string(),
                },
                token.span,
            ),
        }
    }

    /// Synchronize parser state after an error.
    ///
    /// Skips tokens until the next command keyword. At least one token is
    /// consumed if the failed command consumed nothing.
    fn synchronize(&mut self, first: usize) {
        if self.current == first {
            self.advance();
        }
        while !self.is_at_end() && !self.peek_kind().is_keyword() {
            self.advance();
        }
    }

    /// `ERROR` node covering the input skipped since `start`.
    fn error_node(&self, start: Position) -> CstNode {
        let span = self.span_from(start);
        let text = span.slice(self.source).unwrap_or_default();
        CstNode::with_text(NodeKind::Error, span, text)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Create span from start to the end of the previous token.
    fn span_from(&self, start: Position) -> Span {
        let end = self.previous().span.end;
        Span::new(start, end.max(start))
    }
}

// =============================================================================
// TESTS
// =============================================================================
