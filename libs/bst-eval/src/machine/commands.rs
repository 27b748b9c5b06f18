//! Top-level command execution.

use super::Machine;
use crate::error::EvalResult;
use crate::value::Value;
use bst_ast::Command;
use serde::Serialize;
use tree_sitter_bst::SORT_KEY;

/// Result of running a style over a database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Everything written with `write$`, split into lines by `newline$`.
    pub output: String,
    /// Messages from `warning$` and from the interpreter itself.
    pub warnings: Vec<String>,
    /// Values printed by `top$` and `stack$`.
    pub messages: Vec<String>,
}

impl Machine<'_> {
    /// Executes the module's commands in file order.
    ///
    /// `READ` loads the database, `EXECUTE` calls its function once,
    /// `ITERATE` and `REVERSE` call it once per entry and `SORT` orders the
    /// entries by `sort.key$`. A partial last line is flushed at the end.
    pub fn run(&mut self) -> EvalResult<RunReport> {
        let module = self.module;
        for command in module.commands() {
            tracing::debug!(?command, "executing command");
            match command {
                Command::Read => self.read(),
                Command::Execute(name) => {
                    self.current = None;
                    self.execute_named(name)?;
                    self.check_stack_empty(name);
                }
                Command::Iterate(name) => {
                    for index in 0..self.entries.len() {
                        self.current = Some(index);
                        self.execute_named(name)?;
                        self.check_stack_empty(name);
                    }
                    self.current = None;
                }
                Command::Reverse(name) => {
                    for index in (0..self.entries.len()).rev() {
                        self.current = Some(index);
                        self.execute_named(name)?;
                        self.check_stack_empty(name);
                    }
                    self.current = None;
                }
                Command::Sort => self.sort(),
            }
        }

        if !self.line.is_empty() {
            self.newline();
        }
        Ok(RunReport {
            output: std::mem::take(&mut self.output),
            warnings: std::mem::take(&mut self.warnings),
            messages: std::mem::take(&mut self.messages),
        })
    }

    /// Stable sort of the entries by their `sort.key$` strings.
    pub fn sort(&mut self) {
        self.entries.sort_by_cached_key(|entry| {
            entry
                .values
                .get(SORT_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        });
    }

    /// Values left over after a command are discarded with a warning.
    fn check_stack_empty(&mut self, function: &str) {
        if self.stack.is_empty() {
            return;
        }
        let left = self.drain_stack();
        self.warn(format!(
            "{} left {} value(s) on the stack",
            function,
            left.len()
        ));
    }
}
