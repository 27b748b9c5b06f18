//! # Evaluation Errors
//!
//! Error types for running BST code.

use bst_ast::ModuleError;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A primitive needed more operands than the stack holds.
    #[error("Stack underflow in {0}")]
    StackUnderflow(String),

    /// An operand had the wrong type.
    #[error("Type error in {operation}: expected {expected}, found {found}")]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A name that is neither a function nor a variable.
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// `:=` applied to something that is not a variable.
    #[error("Cannot assign to {0}")]
    NotAssignable(String),

    /// Entry data accessed outside `ITERATE`/`REVERSE`.
    #[error("{0} needs a current entry")]
    NoCurrentEntry(String),

    /// Nested calls exceeded the configured depth.
    #[error("Call depth limit of {0} exceeded")]
    RecursionLimit(usize),

    /// The operand stack exceeded the configured size.
    #[error("Operand stack limit of {0} exceeded")]
    StackOverflow(usize),

    /// A `while$` loop exceeded the configured iteration count.
    #[error("while$ exceeded {0} iterations")]
    IterationLimit(usize),

    /// Invalid argument to a built-in.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Loading the style failed.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

/// Result alias used across the interpreter.
pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub(crate) fn type_mismatch(
        operation: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            expected,
            found,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
