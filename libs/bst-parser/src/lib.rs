//! # BST Parser (Pure Rust)
//!
//! A pure Rust parser for BibTeX style (`.bst`) files, driven by the grammar
//! descriptor from `tree-sitter-bst`.
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → CST
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::parse;
//!
//! let cst = parse("FUNCTION {not} { { #0 } { #1 } if$ }");
//! assert!(cst.is_ok());
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! bst-parser → bst-ast → bst-eval
//! ```

pub mod cst;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

pub use cst::{Cst, CstNode, Field, NodeKind};
pub use error::{ParseError, ParseErrorKind};
pub use span::{Position, Span, Spanned};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parse BST source code into a Concrete Syntax Tree.
///
/// ## Parameters
///
/// - `source`: BST source code
///
/// ## Returns
///
/// `Cst` containing the root node and any parse errors. The parser recovers
/// at the next command keyword, so one bad command does not hide the rest of
/// the file. Check `cst.is_ok()` for success.
///
/// ## Example
///
/// ```rust
/// let cst = bst_parser::parse("READ\nSORT");
/// assert!(cst.is_ok());
/// assert_eq!(cst.root.children.len(), 2);
/// ```
pub fn parse(source: &str) -> Cst {
    let tokens = lexer::Lexer::new(source).tokenize();
    let mut parser = parser::Parser::new(source, tokens);
    parser.parse()
}

// =============================================================================
// TESTS
// =============================================================================
