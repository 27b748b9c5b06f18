//! # CST Lowering
//!
//! Walks the commands of a parsed file and builds a [`Module`]. Names are
//! case-insensitive in BST, so every identifier is stored in lower case.

use crate::block::{Block, Instr, Literal};
use crate::error::ModuleError;
use crate::module::{Command, Function, Macro, Module, SymbolKind};
use crate::primitive::Primitive;
use bst_parser::{CstNode, Field, NodeKind, ParseError, ParseErrorKind, Span};
use std::sync::Arc;
use tree_sitter_bst::{CROSSREF_FIELD, SORT_KEY};

/// Builds a module from the top-level nodes of a CST.
pub(crate) struct Lowerer {
    module: Module,
    /// Command targets with their spans, checked once every function is known.
    targets: Vec<(String, Span)>,
}

impl Lowerer {
    /// Start with the names every style gets for free.
    pub(crate) fn new() -> Self {
        let mut module = Module::default();

        module.entry_fields.push(CROSSREF_FIELD.to_string());
        module.symbols.insert(CROSSREF_FIELD.to_string(), SymbolKind::EntryField);

        module.entry_strings.push(SORT_KEY.to_string());
        module.symbols.insert(SORT_KEY.to_string(), SymbolKind::EntryString);

        for name in tree_sitter_bst::language().integer_variables() {
            module.symbols.insert(name.to_string(), SymbolKind::BuiltinInteger);
        }

        Self {
            module,
            targets: Vec::new(),
        }
    }

    /// Lower every command under `root`.
    pub(crate) fn lower(mut self, root: &CstNode) -> Result<Module, ModuleError> {
        for node in root.named_children() {
            match node.kind {
                NodeKind::Entry => {
                    self.declare_list(node, Field::Fields, SymbolKind::EntryField)?;
                    self.declare_list(node, Field::Integers, SymbolKind::EntryInteger)?;
                    self.declare_list(node, Field::Strings, SymbolKind::EntryString)?;
                }
                NodeKind::Integers => self.declare_list(node, Field::Names, SymbolKind::GlobalInteger)?,
                NodeKind::Strings => self.declare_list(node, Field::Names, SymbolKind::GlobalString)?,
                NodeKind::Macro => self.lower_macro(node)?,
                NodeKind::Function => self.lower_function(node)?,
                NodeKind::Read => self.module.commands.push(Command::Read),
                NodeKind::Sort => self.module.commands.push(Command::Sort),
                NodeKind::Execute => {
                    let name = self.target(node)?;
                    self.module.commands.push(Command::Execute(name));
                }
                NodeKind::Iterate => {
                    let name = self.target(node)?;
                    self.module.commands.push(Command::Iterate(name));
                }
                NodeKind::Reverse => {
                    let name = self.target(node)?;
                    self.module.commands.push(Command::Reverse(name));
                }
                NodeKind::Error => return Err(malformed(node, "command")),
                _ => {}
            }
        }

        for (name, span) in &self.targets {
            let known = self.module.get_function(name).is_some() || Primitive::from_name(name).is_some();
            if !known {
                return Err(ModuleError::UndefinedFunction {
                    name: name.clone(),
                    span: *span,
                });
            }
        }

        Ok(self.module)
    }

    // =========================================================================
    // DECLARATIONS
    // =========================================================================

    /// Record a new name, rejecting redeclarations.
    fn declare(&mut self, node: &CstNode, kind: SymbolKind) -> Result<String, ModuleError> {
        let name = normalize(node.text_or_empty());
        if self.module.symbols.contains_key(&name) {
            return Err(ModuleError::DuplicateSymbol { name, span: node.span });
        }
        self.module.symbols.insert(name.clone(), kind);
        Ok(name)
    }

    /// Declare every id of the id list in `field`.
    fn declare_list(&mut self, node: &CstNode, field: Field, kind: SymbolKind) -> Result<(), ModuleError> {
        let list = node
            .child_by_field(field)
            .ok_or_else(|| malformed(node, field.name()))?;

        for id in list.find_children(NodeKind::Id) {
            let name = self.declare(id, kind)?;
            let names = match kind {
                SymbolKind::EntryField => &mut self.module.entry_fields,
                SymbolKind::EntryInteger => &mut self.module.entry_integers,
                SymbolKind::EntryString => &mut self.module.entry_strings,
                SymbolKind::GlobalInteger => &mut self.module.global_integers,
                SymbolKind::GlobalString => &mut self.module.global_strings,
                SymbolKind::BuiltinInteger | SymbolKind::Function => continue,
            };
            names.push(name);
        }
        Ok(())
    }

    fn lower_macro(&mut self, node: &CstNode) -> Result<(), ModuleError> {
        let name_node = node
            .child_by_field(Field::Name)
            .ok_or_else(|| malformed(node, "macro name"))?;
        let name = normalize(name_node.text_or_empty());
        if self.module.macro_value(&name).is_some() {
            return Err(ModuleError::DuplicateSymbol {
                name,
                span: name_node.span,
            });
        }

        let value = node
            .child_by_field(Field::Value)
            .and_then(|string| string.child_by_field(Field::Value))
            .ok_or_else(|| malformed(node, "macro value"))?;

        self.module.macros.push(Macro {
            name,
            value: value.text_or_empty().to_string(),
        });
        Ok(())
    }

    fn lower_function(&mut self, node: &CstNode) -> Result<(), ModuleError> {
        let name_node = node
            .child_by_field(Field::Name)
            .ok_or_else(|| malformed(node, "function name"))?;
        let body = node
            .child_by_field(Field::Body)
            .ok_or_else(|| malformed(node, "function body"))?;

        let name = self.declare(name_node, SymbolKind::Function)?;
        let body = lower_block(body)?;

        self.module
            .function_index
            .insert(name.clone(), self.module.functions.len());
        self.module.functions.push(Function {
            name,
            body: Arc::new(body),
            span: node.span,
        });
        Ok(())
    }

    /// Name of the function an `EXECUTE`, `ITERATE` or `REVERSE` runs.
    fn target(&mut self, node: &CstNode) -> Result<String, ModuleError> {
        let target = node
            .child_by_field(Field::Function)
            .ok_or_else(|| malformed(node, "function name"))?;
        let name = normalize(target.text_or_empty());
        self.targets.push((name.clone(), target.span));
        Ok(name)
    }
}

// =============================================================================
// BLOCKS
// =============================================================================

/// Lower a `block` node into instructions.
pub(crate) fn lower_block(node: &CstNode) -> Result<Block, ModuleError> {
    let mut instrs = Vec::new();
    for term in node.children_by_field(Field::Term) {
        instrs.push(lower_term(term)?);
    }
    Ok(Block::new(instrs, node.span))
}

fn lower_term(term: &CstNode) -> Result<Instr, ModuleError> {
    let instr = match term.kind {
        NodeKind::Integer => {
            let number = term
                .child_by_field(Field::Value)
                .ok_or_else(|| malformed(term, "number"))?;
            let text = number.text_or_empty();
            let value = text.parse::<i64>().map_err(|_| {
                ModuleError::Syntax(vec![ParseError::new(
                    ParseErrorKind::InvalidInteger {
                        text: format!("#{}", text),
                    },
                    term.span,
                )])
            })?;
            Instr::Push(Literal::Integer(value))
        }
        NodeKind::String => {
            let content = term
                .child_by_field(Field::Value)
                .ok_or_else(|| malformed(term, "string content"))?;
            Instr::Push(Literal::String(content.text_or_empty().to_string()))
        }
        NodeKind::Ref => {
            let symbol = term
                .child_by_field(Field::Symbol)
                .ok_or_else(|| malformed(term, "quoted name"))?;
            let name = normalize(symbol.text_or_empty());
            match symbol.kind {
                NodeKind::Builtin => check_builtin(&name, symbol.span)?,
                NodeKind::Operator => check_operator(&name, symbol.span)?,
                _ => {}
            }
            Instr::Push(Literal::Symbol(name))
        }
        NodeKind::Id => Instr::Resolve(normalize(term.text_or_empty())),
        NodeKind::Operator => {
            let name = term.text_or_empty();
            check_operator(name, term.span)?;
            match Primitive::from_name(name) {
                Some(primitive) => Instr::Apply(primitive),
                None => return Err(unknown_operator(name, term.span)),
            }
        }
        NodeKind::Builtin => {
            let name = normalize(term.text_or_empty());
            check_builtin(&name, term.span)?;
            match Primitive::from_name(&name) {
                Some(primitive) => Instr::Apply(primitive),
                None => Instr::Resolve(name),
            }
        }
        NodeKind::Block => Instr::Push(Literal::Block(Arc::new(lower_block(term)?))),
        _ => return Err(malformed(term, "term")),
    };
    Ok(instr)
}

/// Built-in names are either primitives or interpreter-provided variables.
fn check_builtin(name: &str, span: Span) -> Result<(), ModuleError> {
    let grammar = tree_sitter_bst::language();
    let known = grammar.is_builtin(name)
        || grammar.integer_variables().contains(&name)
        || name == SORT_KEY;
    if known {
        Ok(())
    } else {
        Err(ModuleError::UnknownBuiltin {
            name: name.to_string(),
            span,
        })
    }
}

fn check_operator(name: &str, span: Span) -> Result<(), ModuleError> {
    if tree_sitter_bst::language().is_operator(name) {
        Ok(())
    } else {
        Err(unknown_operator(name, span))
    }
}

fn unknown_operator(name: &str, span: Span) -> ModuleError {
    ModuleError::UnknownOperator {
        name: name.to_string(),
        span,
    }
}

/// Error for a node missing a required part. Only reachable with trees that
/// did not come from the parser, e.g. deserialized ones.
fn malformed(node: &CstNode, expected: &str) -> ModuleError {
    ModuleError::Syntax(vec![ParseError::new(
        ParseErrorKind::UnexpectedToken {
            found: node.kind.name().to_string(),
            expected: expected.to_string(),
        },
        node.span,
    )])
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}
