//! # Built-in Functions
//!
//! Semantics of the operators and built-in functions.
//!
//! Operands are listed bottom to top: for `a b -` the machine pops `b`
//! first and pushes `a - b`.
//!
//! | Primitive       | Pops                        | Pushes                  |
//! |-----------------|-----------------------------|-------------------------|
//! | `=` `<` `>`     | two integers (`=`: strings) | 1 or 0                  |
//! | `+` `-`         | two integers                | integer                 |
//! | `*`             | two strings                 | concatenation           |
//! | `:=`            | value, symbol               |                         |
//! | `if$`           | integer, then, else         | whatever the branch does|
//! | `while$`        | condition, body             | whatever the body does  |
//! | `substring$`    | string, start, length       | string                  |
//! | `format.name$`  | names, index, pattern       | string                  |
//! | `change.case$`  | string, specifier           | string                  |
//! | `text.prefix$`  | string, count               | string                  |

pub mod names;
pub mod text;

use crate::error::{EvalError, EvalResult};
use crate::machine::Machine;
use crate::value::Value;
use bst_ast::Primitive;
use text::CaseMode;

impl Machine<'_> {
    /// Applies a primitive to the operand stack.
    pub(crate) fn apply(&mut self, primitive: Primitive) -> EvalResult<()> {
        use Primitive as P;
        let p = primitive;
        match primitive {
            // -----------------------------------------------------------------
            // Operators
            // -----------------------------------------------------------------
            P::Equal => {
                let rhs = self.pop(p)?;
                let lhs = self.pop(p)?;
                let equal = match (&lhs, &rhs) {
                    (Value::Integer(a), Value::Integer(b)) => a == b,
                    (Value::String(a), Value::String(b)) => a == b,
                    _ => {
                        return Err(EvalError::type_mismatch(
                            p.name(),
                            lhs.type_name(),
                            rhs.type_name(),
                        ))
                    }
                };
                self.push(Value::flag(equal))
            }
            P::Less | P::Greater => {
                let rhs = self.pop_integer(p)?;
                let lhs = self.pop_integer(p)?;
                let result = if p == P::Less { lhs < rhs } else { lhs > rhs };
                self.push(Value::flag(result))
            }
            P::Add | P::Subtract => {
                let rhs = self.pop_integer(p)?;
                let lhs = self.pop_integer(p)?;
                let result = if p == P::Add {
                    lhs.checked_add(rhs)
                } else {
                    lhs.checked_sub(rhs)
                };
                let value = result.ok_or_else(|| {
                    EvalError::InvalidArgument(format!("integer overflow in {}", p))
                })?;
                self.push(Value::Integer(value))
            }
            P::Concat => {
                let rhs = self.pop_string(p)?;
                let mut lhs = self.pop_string(p)?;
                lhs.push_str(&rhs);
                self.push(Value::String(lhs))
            }
            P::Assign => {
                let target = self.pop(p)?;
                let value = self.pop(p)?;
                match target {
                    Value::Symbol(name) => self.assign(&name, value),
                    other => Err(EvalError::type_mismatch(
                        p.name(),
                        "function",
                        other.type_name(),
                    )),
                }
            }

            // -----------------------------------------------------------------
            // Control flow
            // -----------------------------------------------------------------
            P::If => {
                let else_branch = self.pop(p)?;
                let then_branch = self.pop(p)?;
                let predicate = self.pop_integer(p)?;
                let branch = if predicate > 0 { then_branch } else { else_branch };
                self.execute_value(&branch, p)
            }
            P::While => {
                let body = self.pop(p)?;
                let condition = self.pop(p)?;
                let limit = self.max_while_iterations();
                let mut iterations = 0;
                loop {
                    self.execute_value(&condition, p)?;
                    if self.pop_integer(p)? <= 0 {
                        return Ok(());
                    }
                    iterations += 1;
                    if iterations > limit {
                        return Err(EvalError::IterationLimit(limit));
                    }
                    self.execute_value(&body, p)?;
                }
            }
            P::CallType => {
                let entry_type = self.current_type(p)?;
                let module = self.module();
                match module
                    .get_function(&entry_type)
                    .or_else(|| module.get_function("default.type"))
                {
                    Some(function) => self.execute_named(&function.name),
                    None => {
                        self.warn(format!(
                            "no function for entry type {} and no default.type",
                            entry_type
                        ));
                        Ok(())
                    }
                }
            }
            P::Skip => Ok(()),

            // -----------------------------------------------------------------
            // Stack
            // -----------------------------------------------------------------
            P::Duplicate => {
                let value = self.pop(p)?;
                self.push(value.clone())?;
                self.push(value)
            }
            P::Pop => self.pop(p).map(drop),
            P::Swap => {
                let top = self.pop(p)?;
                let below = self.pop(p)?;
                self.push(top)?;
                self.push(below)
            }
            P::Top => {
                let value = self.pop(p)?;
                self.message(&value);
                Ok(())
            }
            P::Stack => {
                for value in self.drain_stack().iter().rev() {
                    self.message(value);
                }
                Ok(())
            }

            // -----------------------------------------------------------------
            // Entry data
            // -----------------------------------------------------------------
            P::Cite => {
                let key = self.current_key(p)?;
                self.push(Value::String(key))
            }
            P::Type => {
                let entry_type = self.current_type(p)?;
                self.push(Value::String(entry_type))
            }
            P::Missing => {
                let value = self.pop(p)?;
                self.push(Value::flag(value == Value::Missing))
            }
            P::Empty => {
                let value = self.pop(p)?;
                self.push(Value::flag(value.is_empty()))
            }
            P::Preamble => {
                let preamble = self.preamble();
                self.push(Value::String(preamble))
            }

            // -----------------------------------------------------------------
            // Strings
            // -----------------------------------------------------------------
            P::AddPeriod => {
                let value = self.pop_string(p)?;
                self.push(Value::String(text::add_period(&value)))
            }
            P::ChangeCase => {
                let spec = self.pop_string(p)?;
                let value = self.pop_string(p)?;
                match CaseMode::parse(&spec) {
                    Some(mode) => self.push(Value::String(text::change_case(&value, mode))),
                    None => {
                        self.warn(format!("\"{}\" is an illegal case-conversion string", spec));
                        self.push(Value::String(value))
                    }
                }
            }
            P::ChrToInt => {
                let value = self.pop_string(p)?;
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.push(Value::Integer(i64::from(u32::from(c)))),
                    _ => Err(EvalError::InvalidArgument(format!(
                        "chr.to.int$ expects a single character, got \"{}\"",
                        value
                    ))),
                }
            }
            P::IntToChr => {
                let code = self.pop_integer(p)?;
                let c = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        EvalError::InvalidArgument(format!("{} is not a character code", code))
                    })?;
                self.push(Value::String(c.to_string()))
            }
            P::IntToStr => {
                let value = self.pop_integer(p)?;
                self.push(Value::String(value.to_string()))
            }
            P::Quote => self.push(Value::string("\"")),
            P::Purify => {
                let value = self.pop_string(p)?;
                self.push(Value::String(text::purify(&value)))
            }
            P::Substring => {
                let len = self.pop_integer(p)?;
                let start = self.pop_integer(p)?;
                let value = self.pop_string(p)?;
                self.push(Value::String(text::substring(&value, start, len)))
            }
            P::TextLength => {
                let value = self.pop_string(p)?;
                self.push(Value::Integer(text::text_length(&value) as i64))
            }
            P::TextPrefix => {
                let count = self.pop_integer(p)?;
                let value = self.pop_string(p)?;
                let count = usize::try_from(count).unwrap_or(0);
                self.push(Value::String(text::text_prefix(&value, count)))
            }
            P::Width => {
                let value = self.pop_string(p)?;
                self.push(Value::Integer(text::width(&value)))
            }

            // -----------------------------------------------------------------
            // Names
            // -----------------------------------------------------------------
            P::FormatName => {
                let pattern = self.pop_string(p)?;
                let index = self.pop_integer(p)?;
                let list = self.pop_string(p)?;
                let formatted = names::format_name(&list, index, &pattern)?;
                self.push(Value::String(formatted))
            }
            P::NumNames => {
                let value = self.pop_string(p)?;
                self.push(Value::Integer(names::num_names(&value) as i64))
            }

            // -----------------------------------------------------------------
            // Output
            // -----------------------------------------------------------------
            P::Write => {
                let value = self.pop_string(p)?;
                self.write(&value);
                Ok(())
            }
            P::Newline => {
                self.newline();
                Ok(())
            }
            P::Warning => {
                let value = self.pop_string(p)?;
                self.warn(value);
                Ok(())
            }
        }
    }
}
