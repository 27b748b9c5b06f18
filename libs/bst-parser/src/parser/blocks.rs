//! # Block and Term Parsing
//!
//! ```text
//! id_list   = "{" id* "}"
//! block     = "{" term@term* "}"
//! term      = integer | string | ref | id | operator | builtin | block
//! integer   = "#" number@value
//! string    = "\"" string_content@value "\""
//! ref       = "'" (id | builtin | operator)@symbol
//! ```

use super::Parser;
use crate::cst::{CstNode, Field, NodeKind};
use crate::error::{ParseError, ParseErrorKind};
use config::constants::MAX_BLOCK_DEPTH;
use crate::lexer::{Token, TokenKind};
use crate::span::{Position, Span};

/// Position `bytes` bytes to the right on the same line. Only used for
/// single-byte delimiters.
fn shifted(pos: Position, bytes: usize) -> Position {
    Position::new(pos.byte + bytes, pos.line, pos.column + bytes)
}

/// Position `bytes` bytes to the left on the same line.
fn unshifted(pos: Position, bytes: usize) -> Position {
    Position::new(pos.byte - bytes, pos.line, pos.column - bytes)
}

impl<'a> Parser<'a> {
    /// Parse `{ id* }`.
    pub(super) fn parse_id_list(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        let mut children = vec![self.expect_leaf(TokenKind::LBrace, NodeKind::LBrace)?];

        loop {
            self.comments(&mut children);
            match self.peek_kind() {
                kind if kind.is_identifier() => children.push(self.leaf(NodeKind::Id)),
                TokenKind::RBrace => break,
                _ => return Err(self.error_here("identifier or '}'")),
            }
        }
        children.push(self.leaf(NodeKind::RBrace));

        Ok(CstNode::with_children(NodeKind::IdList, self.span_from(start), children))
    }

    /// Parse `{ term* }`, refusing blocks nested deeper than
    /// [`MAX_BLOCK_DEPTH`].
    pub(super) fn parse_block(&mut self) -> Result<CstNode, ParseError> {
        if self.depth >= MAX_BLOCK_DEPTH {
            let kind = ParseErrorKind::NestingTooDeep { limit: MAX_BLOCK_DEPTH };
            return Err(ParseError::new(kind, self.peek().span));
        }
        self.depth += 1;
        let block = self.parse_block_terms();
        self.depth -= 1;
        block
    }

    fn parse_block_terms(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        let mut children = vec![self.expect_leaf(TokenKind::LBrace, NodeKind::LBrace)?];

        loop {
            self.comments(&mut children);
            if self.check(TokenKind::RBrace) {
                break;
            }
            children.push(self.parse_term()?.in_field(Field::Term));
        }
        children.push(self.leaf(NodeKind::RBrace));

        Ok(CstNode::with_children(NodeKind::Block, self.span_from(start), children))
    }

    /// Parse a single term of a block.
    fn parse_term(&mut self) -> Result<CstNode, ParseError> {
        match self.peek_kind() {
            TokenKind::Integer => Ok(self.parse_integer()),
            TokenKind::String => Ok(self.parse_string()),
            TokenKind::Quote => self.parse_ref(),
            TokenKind::Operator => Ok(self.leaf(NodeKind::Operator)),
            TokenKind::Builtin => Ok(self.leaf(NodeKind::Builtin)),
            TokenKind::LBrace => self.parse_block(),
            kind if kind.is_identifier() => Ok(self.leaf(NodeKind::Id)),
            _ => Err(self.error_here("term or '}'")),
        }
    }

    /// Parse `#number`. The lexer has already validated the literal.
    fn parse_integer(&mut self) -> CstNode {
        let Token { span, text, .. } = self.advance().clone();
        let split = shifted(span.start, 1);
        let children = vec![
            CstNode::with_text(NodeKind::Hash, Span::new(span.start, split), "#"),
            CstNode::with_text(NodeKind::Number, Span::new(split, span.end), &text[1..])
                .in_field(Field::Value),
        ];
        CstNode::with_children(NodeKind::Integer, span, children)
    }

    /// Parse `"content"`. The lexer guarantees both quotes are present.
    pub(super) fn parse_string(&mut self) -> CstNode {
        let Token { span, text, .. } = self.advance().clone();
        let open = shifted(span.start, 1);
        let close = unshifted(span.end, 1);
        let children = vec![
            CstNode::with_text(NodeKind::DoubleQuote, Span::new(span.start, open), "\""),
            CstNode::with_text(NodeKind::StringContent, Span::new(open, close), &text[1..text.len() - 1])
                .in_field(Field::Value),
            CstNode::with_text(NodeKind::DoubleQuote, Span::new(close, span.end), "\""),
        ];
        CstNode::with_children(NodeKind::String, span, children)
    }

    /// Parse `'name`.
    fn parse_ref(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        let quote = self.leaf(NodeKind::Quote);
        let symbol = match self.peek_kind() {
            kind if kind.is_identifier() => self.leaf(NodeKind::Id),
            TokenKind::Builtin => self.leaf(NodeKind::Builtin),
            TokenKind::Operator => self.leaf(NodeKind::Operator),
            _ => return Err(self.error_here("name after quote")),
        };
        Ok(CstNode::with_children(
            NodeKind::Ref,
            self.span_from(start),
            vec![quote, symbol.in_field(Field::Symbol)],
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
