//! # BST Eval Crate
//!
//! Stack machine interpreter for lowered BibTeX style modules.
//!
//! ## Architecture
//!
//! ```text
//! bst-ast (Module) + Database → Machine → RunReport (output, warnings)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bst_ast::Module;
//! use bst_eval::{Database, Entry, Machine};
//!
//! let module = Module::from_text(
//!     "ENTRY { title } { } { } FUNCTION {show} { title write$ newline$ } READ ITERATE {show}",
//! )
//! .unwrap();
//! let database = Database {
//!     preambles: Vec::new(),
//!     entries: vec![Entry::new("k", "misc").with_field("title", "Hello")],
//! };
//! let report = Machine::new(&module).with_database(database).run().unwrap();
//! assert_eq!(report.output, "Hello\n");
//! ```

pub mod builtins;
pub mod database;
pub mod error;
mod machine;
pub mod settings;
pub mod value;

pub use database::{Database, Entry};
pub use error::{EvalError, EvalResult};
pub use machine::{Machine, RunReport};
pub use settings::EvalConfig;
pub use value::Value;

/// Parses and lowers `source`, then runs it over `database`.
pub fn run_source(source: &str, database: Database) -> EvalResult<RunReport> {
    let module = bst_ast::Module::from_text(source)?;
    Machine::new(&module).with_database(database).run()
}
