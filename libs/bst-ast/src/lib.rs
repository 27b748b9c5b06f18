//! # BST AST Crate
//!
//! Lowers the CST produced by `bst-parser` into a [`Module`]: declarations,
//! functions with lowered bodies, and the command sequence. Also infers the
//! stack effect of every function by naive beta-reduction.
//!
//! ## Architecture
//!
//! ```text
//! BST Source → bst-parser (CST) → bst-ast (Module, Reduction)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bst_ast::Module;
//!
//! let module = Module::from_text("FUNCTION {not} { { #0 } { #1 } if$ }").unwrap();
//! let signature = module.signature("not").unwrap();
//! assert_eq!((signature.inputs, signature.outputs), (1, 1));
//! ```

pub mod block;
pub mod diagnostic;
pub mod error;
mod lower;
pub mod module;
pub mod primitive;
pub mod reduce;

pub use block::{Block, Instr, Literal};
pub use diagnostic::{Diagnostic, Severity};
pub use error::ModuleError;
pub use module::{Command, Function, Macro, Module, SymbolKind};
pub use primitive::{Primitive, StackEffect};
pub use reduce::{reduce, Clause, Operation, Reducer, Reduction, Signature, Slot};
