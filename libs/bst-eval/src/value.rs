use bst_ast::{Block, Literal};
use std::fmt;
use std::sync::Arc;

/// A value on the operand stack or stored in a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    String(String),
    /// A quoted name (`'name`); functions and variables are passed this way.
    Symbol(String),
    /// An inline `{ ... }` block.
    Block(Arc<Block>),
    /// Value of an entry field absent from the database entry.
    Missing,
}

impl Value {
    /// Shorthand for a string value.
    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    /// Shorthand for an integer value built from a flag.
    pub fn flag(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }

    /// Name of the value's type, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Symbol(_) => "function",
            Self::Block(_) => "block",
            Self::Missing => "missing field",
        }
    }

    /// Integer payload, if any.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// True for missing fields and strings with only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::String(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Integer(value) => Self::Integer(*value),
            Literal::String(value) => Self::String(value.clone()),
            Literal::Symbol(name) => Self::Symbol(name.clone()),
            Literal::Block(block) => Self::Block(Arc::clone(block)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Renders the value the way `top$` and `stack$` print it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "\"{}\"", value),
            Self::Symbol(name) => write!(f, "'{}", name),
            Self::Block(block) => write!(f, "{}", block),
            Self::Missing => f.write_str("missing"),
        }
    }
}
