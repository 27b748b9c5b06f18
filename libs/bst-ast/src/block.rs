//! # Blocks and Instructions
//!
//! Lowered form of a function body: each term of a `{ ... }` block becomes
//! one [`Instr`].

use crate::primitive::Primitive;
use bst_parser::Span;
use std::fmt;
use std::sync::Arc;

/// A value written directly in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `#12`
    Integer(i64),
    /// `"text"`
    String(String),
    /// `'name`, pushed without being evaluated.
    Symbol(String),
    /// `{ ... }`, pushed as a function value.
    Block(Arc<Block>),
}

/// A single lowered term.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Push a literal value.
    Push(Literal),
    /// Look up a name: call a function or push a variable's value.
    Resolve(String),
    /// Apply an operator or built-in function.
    Apply(Primitive),
}

/// A lowered `{ ... }` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Instructions in source order.
    pub instrs: Vec<Instr>,
    /// Source span of the block, braces included.
    pub span: Span,
}

impl Block {
    /// Create a block.
    pub fn new(instrs: Vec<Instr>, span: Span) -> Self {
        Self { instrs, span }
    }

    /// Number of instructions, not counting nested blocks.
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Returns true if the block has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "#{}", value),
            Self::String(value) => write!(f, "\"{}\"", value),
            Self::Symbol(name) => write!(f, "'{}", name),
            Self::Block(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(literal) => write!(f, "{}", literal),
            Self::Resolve(name) => f.write_str(name),
            Self::Apply(primitive) => write!(f, "{}", primitive),
        }
    }
}

/// Renders the block back in BST syntax on one line.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for instr in &self.instrs {
            write!(f, " {}", instr)?;
        }
        f.write_str(" }")
    }
}
