//! # Module
//!
//! A loaded style file: declarations, functions and the command sequence.
//!
//! ## Example
//!
//! ```rust
//! use bst_ast::Module;
//!
//! let module = Module::from_text("FUNCTION {not} { { #0 } { #1 } if$ }").unwrap();
//! assert_eq!(module.list_functions(), vec!["not"]);
//! ```

use crate::block::Block;
use crate::error::ModuleError;
use crate::lower::Lowerer;
use crate::reduce::{Reducer, Reduction, Signature};
use bst_parser::{Cst, Span};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// DECLARATIONS
// =============================================================================

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Field read from each database entry (`ENTRY` first list).
    EntryField,
    /// Per-entry integer variable.
    EntryInteger,
    /// Per-entry string variable.
    EntryString,
    /// Global integer variable.
    GlobalInteger,
    /// Global string variable.
    GlobalString,
    /// Integer constant provided by the interpreter (`entry.max$`, `global.max$`).
    BuiltinInteger,
    /// User function.
    Function,
}

impl SymbolKind {
    /// Whether `:=` can store into a symbol of this kind.
    pub const fn is_assignable(&self) -> bool {
        matches!(
            self,
            Self::EntryInteger | Self::EntryString | Self::GlobalInteger | Self::GlobalString
        )
    }

    /// Whether the symbol holds a value rather than code.
    pub const fn is_variable(&self) -> bool {
        !matches!(self, Self::Function)
    }
}

/// A user function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Lowered body.
    pub body: Arc<Block>,
    /// Span of the whole `FUNCTION` command.
    pub span: Span,
}

/// A `MACRO {name} {"value"}` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macro {
    pub name: String,
    pub value: String,
}

/// An executable top-level command, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// `READ`: load the database.
    Read,
    /// `EXECUTE {f}`: call `f` once.
    Execute(String),
    /// `ITERATE {f}`: call `f` for every entry.
    Iterate(String),
    /// `REVERSE {f}`: call `f` for every entry, last to first.
    Reverse(String),
    /// `SORT`: order entries by `sort.key$`.
    Sort,
}

// =============================================================================
// MODULE
// =============================================================================

/// A lowered style file.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub(crate) entry_fields: Vec<String>,
    pub(crate) entry_integers: Vec<String>,
    pub(crate) entry_strings: Vec<String>,
    pub(crate) global_integers: Vec<String>,
    pub(crate) global_strings: Vec<String>,
    pub(crate) macros: Vec<Macro>,
    pub(crate) functions: Vec<Function>,
    pub(crate) commands: Vec<Command>,
    pub(crate) symbols: HashMap<String, SymbolKind>,
    pub(crate) function_index: HashMap<String, usize>,
}

impl Module {
    /// Parse and lower BST source text.
    pub fn from_text(source: &str) -> Result<Self, ModuleError> {
        Self::from_cst(&bst_parser::parse(source))
    }

    /// Read, parse and lower a style file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModuleError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ModuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&source)
    }

    /// Lower an already parsed tree.
    ///
    /// Fails with [`ModuleError::Syntax`] if the tree carries parse errors and
    /// with [`ModuleError::EmptySource`] if it has no commands at all.
    pub fn from_cst(cst: &Cst) -> Result<Self, ModuleError> {
        if !cst.is_ok() {
            return Err(ModuleError::Syntax(cst.errors.clone()));
        }
        if cst.root.children.is_empty() {
            return Err(ModuleError::EmptySource);
        }

        let module = Lowerer::new().lower(&cst.root)?;
        tracing::debug!(
            functions = module.functions.len(),
            macros = module.macros.len(),
            commands = module.commands.len(),
            "lowered module"
        );
        Ok(module)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Function names in declaration order.
    pub fn list_functions(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Function by name.
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.function_index.get(name).map(|&i| &self.functions[i])
    }

    /// What `name` refers to, if it is declared or provided by the interpreter.
    pub fn symbol(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.get(name).copied()
    }

    /// Macros in declaration order.
    pub fn macros(&self) -> &[Macro] {
        &self.macros
    }

    /// Value of a macro.
    pub fn macro_value(&self, name: &str) -> Option<&str> {
        self.macros
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value.as_str())
    }

    /// Commands in file order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Fields declared in `ENTRY`, plus the implicit `crossref`.
    pub fn entry_fields(&self) -> &[String] {
        &self.entry_fields
    }

    /// Per-entry integer variables declared in `ENTRY`.
    pub fn entry_integers(&self) -> &[String] {
        &self.entry_integers
    }

    /// Per-entry string variables declared in `ENTRY`, plus `sort.key$`.
    pub fn entry_strings(&self) -> &[String] {
        &self.entry_strings
    }

    /// Variables declared with `INTEGERS`.
    pub fn global_integers(&self) -> &[String] {
        &self.global_integers
    }

    /// Variables declared with `STRINGS`.
    pub fn global_strings(&self) -> &[String] {
        &self.global_strings
    }

    // =========================================================================
    // ANALYSIS
    // =========================================================================

    /// Inferred stack signature of a function.
    pub fn signature(&self, name: &str) -> Option<Signature> {
        let function = self.get_function(name)?;
        Some(Reducer::new(self).reduce_function(function).signature())
    }

    /// Reductions of every function, in declaration order.
    pub fn reductions(&self) -> Vec<Reduction> {
        let mut reducer = Reducer::new(self);
        self.functions
            .iter()
            .map(|function| reducer.reduce_function(function))
            .collect()
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vars = self.entry_fields.len()
            + self.entry_integers.len()
            + self.entry_strings.len()
            + self.global_integers.len()
            + self.global_strings.len();
        write!(f, "Module(funcs={}, vars={})", self.functions.len(), vars)
    }
}
