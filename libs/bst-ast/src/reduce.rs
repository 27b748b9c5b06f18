//! # Reduction
//!
//! Naive beta-reduction of a block over a symbolic stack. The result lists
//! one [`Clause`] per primitive application or function call and infers how
//! many values the block takes from and leaves on the stack.
//!
//! Arguments a block needs but does not push itself become fresh inputs.
//! `if$` takes the larger effect of its two branches.
//!
//! ```text
//! not(1 args) -> 1-tuple {
//!   d = if$ a b c
//! }
//! ```

use crate::block::{Block, Instr, Literal};
use crate::diagnostic::Diagnostic;
use crate::module::{Function, Module, SymbolKind};
use crate::primitive::{Primitive, StackEffect};
use bst_parser::Span;
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// TYPES
// =============================================================================

/// Stack effect inferred for a block or function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    /// Values taken from the caller's stack.
    pub inputs: usize,
    /// Values left on the stack.
    pub outputs: usize,
}

impl Signature {
    pub const fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    /// Net change of the stack depth.
    pub const fn net(&self) -> isize {
        self.outputs as isize - self.inputs as isize
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.inputs, self.outputs)
    }
}

/// A symbolic stack value.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// The n-th value taken from the caller.
    Input(usize),
    /// The n-th intermediate result.
    Temp(usize),
    /// A literal pushed by the block.
    Literal(Literal),
    /// The value of a variable.
    Var(String),
}

/// What a clause applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Primitive(Primitive),
    Call(String),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{}", primitive),
            Self::Call(name) => f.write_str(name),
        }
    }
}

/// One application: `outputs = op inputs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub op: Operation,
    pub inputs: Vec<Slot>,
    pub outputs: Vec<Slot>,
}

/// Renders slots positionally: inputs are named `a`, `b`, ... and outputs
/// continue the sequence.
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<_> = (0..self.inputs.len()).map(slot_name).collect();
        let outputs: Vec<_> = (self.inputs.len()..self.inputs.len() + self.outputs.len())
            .map(slot_name)
            .collect();

        let mut parts = Vec::with_capacity(inputs.len() + outputs.len() + 2);
        if !outputs.is_empty() {
            parts.extend(outputs);
            parts.push("=".to_string());
        }
        parts.push(self.op.to_string());
        parts.extend(inputs);
        f.write_str(&parts.join(" "))
    }
}

fn slot_name(index: usize) -> String {
    let letter = char::from(b'a' + (index % 26) as u8);
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{}{}", letter, round),
    }
}

/// Result of reducing a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// Function name, `None` for anonymous blocks.
    pub name: Option<String>,
    /// Number of values taken from the caller.
    pub inputs: usize,
    /// Number of values left on the stack.
    pub outputs: usize,
    /// Applications in evaluation order.
    pub clauses: Vec<Clause>,
    /// Warnings about effects that could not be inferred exactly.
    pub diagnostics: Vec<Diagnostic>,
}

impl Reduction {
    pub fn signature(&self) -> Signature {
        Signature::new(self.inputs, self.outputs)
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}({} args) -> {}-tuple {{",
            self.name.as_deref().unwrap_or("lambda"),
            self.inputs,
            self.outputs
        )?;
        for clause in &self.clauses {
            writeln!(f, "  {}", clause)?;
        }
        f.write_str("}")
    }
}

/// Reduce an anonymous block in the context of `module`.
pub fn reduce(block: &Block, module: &Module) -> Reduction {
    Reducer::new(module).reduce_block(block)
}

// =============================================================================
// FRAME
// =============================================================================

/// Symbolic state while reducing one block.
#[derive(Default)]
struct Frame {
    stack: Vec<Slot>,
    inputs: usize,
    temps: usize,
    clauses: Vec<Clause>,
    diagnostics: Vec<Diagnostic>,
}

impl Frame {
    /// Take `count` values, bottom first. Missing values become new inputs.
    fn pop_args(&mut self, count: usize) -> Vec<Slot> {
        let available = self.stack.len().min(count);
        let missing = count - available;
        let mut args: Vec<Slot> = (self.inputs..self.inputs + missing).map(Slot::Input).collect();
        self.inputs += missing;
        args.extend(self.stack.drain(self.stack.len() - available..));
        args
    }

    fn fresh(&mut self, count: usize) -> Vec<Slot> {
        let slots = (self.temps..self.temps + count).map(Slot::Temp).collect();
        self.temps += count;
        slots
    }

    /// Record an application consuming `args` and producing `outputs` results.
    fn apply(&mut self, op: Operation, args: Vec<Slot>, outputs: usize) {
        let outputs = self.fresh(outputs);
        self.stack.extend(outputs.iter().cloned());
        self.clauses.push(Clause {
            op,
            inputs: args,
            outputs,
        });
    }

    fn warn(&mut self, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::warning(message, span));
    }

    fn finish(self, name: Option<String>) -> Reduction {
        Reduction {
            name,
            inputs: self.inputs,
            outputs: self.stack.len(),
            clauses: self.clauses,
            diagnostics: self.diagnostics,
        }
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Reduces blocks, memoising function signatures.
pub struct Reducer<'m> {
    module: &'m Module,
    signatures: HashMap<String, Signature>,
    /// Functions currently being reduced, to detect recursion.
    active: Vec<String>,
}

impl<'m> Reducer<'m> {
    pub fn new(module: &'m Module) -> Self {
        Self {
            module,
            signatures: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// Reduce a function body and remember its signature.
    pub fn reduce_function(&mut self, function: &Function) -> Reduction {
        self.active.push(function.name.clone());
        let mut reduction = self.reduce_block(&function.body);
        self.active.pop();

        reduction.name = Some(function.name.clone());
        self.signatures
            .insert(function.name.clone(), reduction.signature());
        reduction
    }

    /// Reduce an anonymous block.
    pub fn reduce_block(&mut self, block: &Block) -> Reduction {
        let mut frame = Frame::default();
        for instr in &block.instrs {
            match instr {
                Instr::Push(literal) => frame.stack.push(Slot::Literal(literal.clone())),
                Instr::Resolve(name) => self.resolve(&mut frame, name, block.span),
                Instr::Apply(primitive) => self.apply(&mut frame, *primitive, block.span),
            }
        }
        frame.finish(None)
    }

    fn resolve(&mut self, frame: &mut Frame, name: &str, span: Span) {
        match self.module.symbol(name) {
            Some(SymbolKind::Function) => {
                let signature = self.function_signature(frame, name, span);
                let args = frame.pop_args(signature.inputs);
                frame.apply(Operation::Call(name.to_string()), args, signature.outputs);
            }
            Some(_) => frame.stack.push(Slot::Var(name.to_string())),
            None => {
                frame.warn(format!("unknown identifier '{}'", name), span);
                frame.stack.push(Slot::Var(name.to_string()));
            }
        }
    }

    fn apply(&mut self, frame: &mut Frame, primitive: Primitive, span: Span) {
        let op = Operation::Primitive(primitive);

        if let StackEffect::Fixed { inputs, outputs } = primitive.stack_effect() {
            let args = frame.pop_args(inputs);
            frame.apply(op, args, outputs);
            return;
        }

        match primitive {
            Primitive::If => {
                let mut args = frame.pop_args(3);
                let then_sig = self.branch_signature(frame, &args[1], span);
                let else_sig = self.branch_signature(frame, &args[2], span);
                if then_sig.net() != else_sig.net() {
                    frame.warn(
                        format!(
                            "if$ branches have different effects ({} vs {}); using the larger",
                            then_sig, else_sig
                        ),
                        span,
                    );
                }

                let extra = then_sig.inputs.max(else_sig.inputs);
                let outputs = then_sig.outputs.max(else_sig.outputs);
                let mut all = frame.pop_args(extra);
                all.append(&mut args);
                frame.apply(op, all, outputs);
            }
            Primitive::While => {
                let mut args = frame.pop_args(2);
                let cond_sig = self.branch_signature(frame, &args[0], span);
                let body_sig = self.branch_signature(frame, &args[1], span);
                if cond_sig.net() != 1 || body_sig.net() != 0 {
                    frame.warn(
                        format!(
                            "while$ expects a 1-result condition and a balanced body, got {} and {}",
                            cond_sig, body_sig
                        ),
                        span,
                    );
                }

                let extra = cond_sig.inputs.max(body_sig.inputs);
                let mut all = frame.pop_args(extra);
                all.append(&mut args);
                frame.apply(op, all, extra);
            }
            Primitive::CallType => {
                frame.warn(
                    "effect of call.type$ depends on the entry type; assuming 0 -> 0".to_string(),
                    span,
                );
                frame.apply(op, Vec::new(), 0);
            }
            Primitive::Stack => {
                let depth = frame.stack.len();
                let args = frame.pop_args(depth);
                frame.apply(op, args, 0);
            }
            _ => frame.apply(op, Vec::new(), 0),
        }
    }

    /// Signature of a function value passed to `if$` or `while$`.
    fn branch_signature(&mut self, frame: &mut Frame, slot: &Slot, span: Span) -> Signature {
        match slot {
            Slot::Literal(Literal::Block(block)) => {
                let reduction = self.reduce_block(block);
                frame.diagnostics.extend(reduction.diagnostics.iter().cloned());
                reduction.signature()
            }
            Slot::Literal(Literal::Symbol(name)) => {
                if let Some(primitive) = Primitive::from_name(name) {
                    return match primitive.stack_effect() {
                        StackEffect::Fixed { inputs, outputs } => Signature::new(inputs, outputs),
                        StackEffect::Dynamic => {
                            frame.warn(format!("effect of '{}' is not static", name), span);
                            Signature::default()
                        }
                    };
                }
                if self.module.symbol(name) == Some(SymbolKind::Function) {
                    return self.function_signature(frame, name, span);
                }
                frame.warn(format!("'{}' is not a function", name), span);
                Signature::default()
            }
            other => {
                frame.warn(format!("cannot infer the function passed as {:?}", other), span);
                Signature::default()
            }
        }
    }

    fn function_signature(&mut self, frame: &mut Frame, name: &str, span: Span) -> Signature {
        if let Some(signature) = self.signatures.get(name) {
            return *signature;
        }
        if self.active.iter().any(|active| active == name) {
            frame.warn(format!("recursive call of '{}'; assuming 0 -> 0", name), span);
            return Signature::default();
        }
        let module = self.module;
        match module.get_function(name) {
            Some(function) => self.reduce_function(function).signature(),
            None => Signature::default(),
        }
    }
}
