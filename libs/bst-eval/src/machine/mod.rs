//! # Stack Machine
//!
//! Executes lowered blocks against an operand stack.
//!
//! ## State
//!
//! | Field       | Holds                                                  |
//! |-------------|--------------------------------------------------------|
//! | `stack`     | Operand stack, top at the end                          |
//! | `globals`   | `INTEGERS` and `STRINGS` variables                     |
//! | `entries`   | Per-entry fields and variables, filled by `READ`       |
//! | `current`   | Entry processed by `ITERATE`/`REVERSE`, if any         |
//! | `line`      | Output line being assembled by `write$`                |
//!
//! Nested calls are bounded by [`Limits::max_call_depth`] and run on a stack
//! grown on demand by `stacker`.
//!
//! [`Limits::max_call_depth`]: config::constants::Limits

mod commands;

use crate::settings::EvalConfig;
use crate::database::Database;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use bst_ast::{Block, Instr, Module, Primitive, SymbolKind};
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;
use std::collections::HashMap;

pub use commands::RunReport;

/// Fields and variables of one database entry.
#[derive(Debug, Clone)]
struct EntryState {
    key: String,
    entry_type: String,
    values: HashMap<String, Value>,
}

/// Interpreter for one [`Module`].
///
/// # Examples
/// ```
/// use bst_ast::Module;
/// use bst_eval::{Machine, Value};
///
/// let module = Module::from_text("FUNCTION {not} { { #0 } { #1 } if$ }").unwrap();
/// let stack = Machine::new(&module).call("not", vec![Value::Integer(0)]).unwrap();
/// assert_eq!(stack, vec![Value::Integer(1)]);
/// ```
#[derive(Debug)]
pub struct Machine<'m> {
    module: &'m Module,
    config: EvalConfig,
    database: Database,
    stack: Vec<Value>,
    globals: HashMap<String, Value>,
    entries: Vec<EntryState>,
    current: Option<usize>,
    output: String,
    line: String,
    warnings: Vec<String>,
    messages: Vec<String>,
    depth: usize,
}

impl<'m> Machine<'m> {
    /// Creates a machine with default limits and an empty database.
    pub fn new(module: &'m Module) -> Self {
        let mut globals = HashMap::new();
        for name in module.global_integers() {
            globals.insert(name.clone(), Value::Integer(0));
        }
        for name in module.global_strings() {
            globals.insert(name.clone(), Value::string(""));
        }
        Self {
            module,
            config: EvalConfig::default(),
            database: Database::default(),
            stack: Vec::new(),
            globals,
            entries: Vec::new(),
            current: None,
            output: String::new(),
            line: String::new(),
            warnings: Vec::new(),
            messages: Vec::new(),
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the entries loaded by `READ`.
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = database.normalized();
        self
    }

    // =========================================================================
    // ENTRY POINTS
    // =========================================================================

    /// Runs `block` on the stack `init` and returns the final stack.
    pub fn evaluate(&mut self, block: &Block, init: Vec<Value>) -> EvalResult<Vec<Value>> {
        self.reset_stack(init)?;
        self.enter(|machine| machine.execute_block(block))?;
        Ok(std::mem::take(&mut self.stack))
    }

    /// Calls a user function with `args` pushed in order and returns the
    /// final stack.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> EvalResult<Vec<Value>> {
        let name = name.to_lowercase();
        let module = self.module;
        let function = module
            .get_function(&name)
            .ok_or(EvalError::UnknownIdentifier(name))?;
        self.reset_stack(args)?;
        self.enter(|machine| machine.execute_block(&function.body))?;
        Ok(std::mem::take(&mut self.stack))
    }

    /// Loads the database into per-entry state, as `READ` does.
    pub fn read(&mut self) {
        let module = self.module;
        let database = &self.database;
        self.entries = database
            .entries
            .iter()
            .map(|entry| {
                let mut values = HashMap::new();
                for field in module.entry_fields() {
                    let value = entry
                        .field(field, database)
                        .map_or(Value::Missing, Value::from);
                    values.insert(field.clone(), value);
                }
                for name in module.entry_integers() {
                    values.insert(name.clone(), Value::Integer(0));
                }
                for name in module.entry_strings() {
                    values.insert(name.clone(), Value::string(""));
                }
                EntryState {
                    key: entry.key.clone(),
                    entry_type: entry.entry_type.clone(),
                    values,
                }
            })
            .collect();
        tracing::debug!(entries = self.entries.len(), "read database");
    }

    /// Makes the `index`-th loaded entry current, or clears it with `None`.
    pub fn select_entry(&mut self, index: Option<usize>) -> EvalResult<()> {
        if let Some(i) = index {
            if i >= self.entries.len() {
                return Err(EvalError::InvalidArgument(format!(
                    "entry index {} out of range ({} entries)",
                    i,
                    self.entries.len()
                )));
            }
        }
        self.current = index;
        Ok(())
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Current operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Value of a global variable.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Keys of the loaded entries in their current order.
    pub fn entry_keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// Value of a field or entry variable of the `index`-th entry.
    pub fn entry_value(&self, index: usize, name: &str) -> Option<&Value> {
        self.entries.get(index)?.values.get(name)
    }

    /// Completed output lines.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    fn execute_block(&mut self, block: &Block) -> EvalResult<()> {
        for instr in &block.instrs {
            match instr {
                Instr::Push(literal) => self.push(Value::from(literal))?,
                Instr::Resolve(name) => self.resolve(name)?,
                Instr::Apply(primitive) => self.apply(*primitive)?,
            }
        }
        Ok(())
    }

    /// Runs `f` one call level deeper.
    fn enter<F>(&mut self, f: F) -> EvalResult<()>
    where
        F: FnOnce(&mut Self) -> EvalResult<()>,
    {
        let limit = self.config.limits.max_call_depth;
        if self.depth >= limit {
            return Err(EvalError::RecursionLimit(limit));
        }
        self.depth += 1;
        let result = maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || f(self));
        self.depth -= 1;
        result
    }

    /// A bare name: call the function or push the variable's value.
    fn resolve(&mut self, name: &str) -> EvalResult<()> {
        let module = self.module;
        if let Some(function) = module.get_function(name) {
            tracing::trace!(function = name, depth = self.depth, "call");
            return self.enter(|machine| machine.execute_block(&function.body));
        }
        let value = self.variable(name)?;
        self.push(value)
    }

    /// Executes a function name given to `EXECUTE`, `ITERATE` or `REVERSE`.
    pub(crate) fn execute_named(&mut self, name: &str) -> EvalResult<()> {
        let module = self.module;
        if let Some(function) = module.get_function(name) {
            tracing::trace!(function = name, depth = self.depth, "call");
            return self.enter(|machine| machine.execute_block(&function.body));
        }
        match Primitive::from_name(name) {
            Some(primitive) => self.apply(primitive),
            None => Err(EvalError::UnknownIdentifier(name.to_string())),
        }
    }

    /// Executes a function value popped by `operation`.
    pub(crate) fn execute_value(&mut self, value: &Value, operation: Primitive) -> EvalResult<()> {
        match value {
            Value::Block(block) => self.enter(|machine| machine.execute_block(block)),
            Value::Symbol(name) => self.execute_named(name),
            other => Err(EvalError::type_mismatch(
                operation.name(),
                "function",
                other.type_name(),
            )),
        }
    }

    fn variable(&self, name: &str) -> EvalResult<Value> {
        match self.module.symbol(name) {
            Some(SymbolKind::EntryField | SymbolKind::EntryInteger | SymbolKind::EntryString) => {
                let entry = self.current_entry(name)?;
                Ok(entry.values.get(name).cloned().unwrap_or(Value::Missing))
            }
            Some(SymbolKind::GlobalInteger | SymbolKind::GlobalString) => self
                .globals
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string())),
            Some(SymbolKind::BuiltinInteger) => match name {
                "entry.max$" => Ok(Value::Integer(self.config.entry_max)),
                "global.max$" => Ok(Value::Integer(self.config.global_max)),
                _ => Err(EvalError::UnknownIdentifier(name.to_string())),
            },
            Some(SymbolKind::Function) | None => {
                Err(EvalError::UnknownIdentifier(name.to_string()))
            }
        }
    }

    /// Stores into the variable named by `name`; used by `:=`.
    pub(crate) fn assign(&mut self, name: &str, value: Value) -> EvalResult<()> {
        let kind = self
            .module
            .symbol(name)
            .filter(SymbolKind::is_assignable)
            .ok_or_else(|| EvalError::NotAssignable(name.to_string()))?;

        let value = match (kind, value) {
            (SymbolKind::EntryInteger | SymbolKind::GlobalInteger, value @ Value::Integer(_)) => {
                value
            }
            (SymbolKind::EntryInteger | SymbolKind::GlobalInteger, other) => {
                return Err(EvalError::type_mismatch(":=", "integer", other.type_name()))
            }
            (_, Value::String(text)) => Value::String(self.truncate(kind, name, text)),
            (_, other) => {
                return Err(EvalError::type_mismatch(":=", "string", other.type_name()))
            }
        };

        if matches!(kind, SymbolKind::EntryInteger | SymbolKind::EntryString) {
            let index = self.current_index(":=")?;
            self.entries[index].values.insert(name.to_string(), value);
        } else {
            self.globals.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Cuts a string to `entry.max$` or `global.max$` characters.
    fn truncate(&mut self, kind: SymbolKind, name: &str, text: String) -> String {
        let max = match kind {
            SymbolKind::EntryString => self.config.entry_max,
            _ => self.config.global_max,
        };
        let max = usize::try_from(max).unwrap_or(0);
        if text.chars().count() <= max {
            return text;
        }
        self.warn(format!(
            "value of {} exceeds {} characters and was truncated",
            name, max
        ));
        text.chars().take(max).collect()
    }

    // =========================================================================
    // STACK AND STATE HELPERS
    // =========================================================================

    fn reset_stack(&mut self, init: Vec<Value>) -> EvalResult<()> {
        let limit = self.config.limits.max_stack_size;
        if init.len() > limit {
            return Err(EvalError::StackOverflow(limit));
        }
        self.stack = init;
        Ok(())
    }

    pub(crate) fn push(&mut self, value: Value) -> EvalResult<()> {
        let limit = self.config.limits.max_stack_size;
        if self.stack.len() >= limit {
            return Err(EvalError::StackOverflow(limit));
        }
        self.stack.push(value);
        Ok(())
    }

    pub(crate) fn pop(&mut self, operation: Primitive) -> EvalResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| EvalError::StackUnderflow(operation.name().to_string()))
    }

    pub(crate) fn pop_integer(&mut self, operation: Primitive) -> EvalResult<i64> {
        match self.pop(operation)? {
            Value::Integer(value) => Ok(value),
            other => Err(EvalError::type_mismatch(
                operation.name(),
                "integer",
                other.type_name(),
            )),
        }
    }

    pub(crate) fn pop_string(&mut self, operation: Primitive) -> EvalResult<String> {
        match self.pop(operation)? {
            Value::String(value) => Ok(value),
            other => Err(EvalError::type_mismatch(
                operation.name(),
                "string",
                other.type_name(),
            )),
        }
    }

    fn current_index(&self, operation: &str) -> EvalResult<usize> {
        self.current
            .ok_or_else(|| EvalError::NoCurrentEntry(operation.to_string()))
    }

    fn current_entry(&self, operation: &str) -> EvalResult<&EntryState> {
        let index = self.current_index(operation)?;
        Ok(&self.entries[index])
    }

    pub(crate) fn current_key(&self, operation: Primitive) -> EvalResult<String> {
        Ok(self.current_entry(operation.name())?.key.clone())
    }

    pub(crate) fn current_type(&self, operation: Primitive) -> EvalResult<String> {
        Ok(self.current_entry(operation.name())?.entry_type.clone())
    }

    pub(crate) fn module(&self) -> &'m Module {
        self.module
    }

    pub(crate) fn preamble(&self) -> String {
        self.database.preamble()
    }

    pub(crate) fn max_while_iterations(&self) -> usize {
        self.config.limits.max_while_iterations
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.line.push_str(text);
    }

    pub(crate) fn newline(&mut self) {
        self.output.push_str(&self.line);
        self.output.push('\n');
        self.line.clear();
    }

    pub(crate) fn warn(&mut self, message: String) {
        tracing::debug!(warning = %message, "style warning");
        self.warnings.push(message);
    }

    /// Records a value printed by `top$` or `stack$`.
    pub(crate) fn message(&mut self, value: &Value) {
        tracing::debug!(value = %value, "stack value");
        self.messages.push(value.to_string());
    }

    pub(crate) fn drain_stack(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.stack)
    }
}

#[cfg(test)]
mod tests;
