//! # Module Errors
//!
//! Errors raised while lowering a CST into a [`crate::Module`].

use bst_parser::{ParseError, Span};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a module.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The source has syntax errors. Holds every error the parser reported.
    #[error("{} syntax error(s), first: {}", .0.len(), first_error(.0))]
    Syntax(Vec<ParseError>),

    /// A name is declared twice.
    #[error("duplicate declaration of '{name}' at {}:{}", .span.start.line + 1, .span.start.column + 1)]
    DuplicateSymbol { name: String, span: Span },

    /// A `$`-suffixed name that is not a built-in.
    #[error("unknown built-in '{name}' at {}:{}", .span.start.line + 1, .span.start.column + 1)]
    UnknownBuiltin { name: String, span: Span },

    /// An operator the language does not define.
    #[error("unknown operator '{name}' at {}:{}", .span.start.line + 1, .span.start.column + 1)]
    UnknownOperator { name: String, span: Span },

    /// A command names a function that is never declared.
    #[error("undefined function '{name}' at {}:{}", .span.start.line + 1, .span.start.column + 1)]
    UndefinedFunction { name: String, span: Span },

    /// The source contains no commands.
    #[error("empty or malformed BST source")]
    EmptySource,

    /// Reading the source failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn first_error(errors: &[ParseError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}
