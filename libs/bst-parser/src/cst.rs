//! # Concrete Syntax Tree (CST)
//!
//! CST types for parsed BST source. Node kinds and field names line up with
//! the symbol and field tables of the grammar descriptor, so a node can be
//! mapped to its descriptor id with [`CstNode::kind_id`].
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::cst::NodeKind;
//!
//! let cst = bst_parser::parse("READ");
//! assert_eq!(cst.root.kind, NodeKind::SourceFile);
//! assert_eq!(cst.root.to_sexp(), "(source_file (read))");
//! ```

use crate::error::ParseError;
use crate::span::{Span, Spanned};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tree_sitter_bst::Command;

// =============================================================================
// CST
// =============================================================================

/// Concrete Syntax Tree result.
///
/// Contains the root node and any parse errors.
#[derive(Debug, Clone, Serialize)]
pub struct Cst {
    /// Root node of the syntax tree.
    pub root: CstNode,
    /// Parse errors encountered.
    pub errors: Vec<ParseError>,
}

impl Cst {
    /// Create a new CST.
    pub fn new(root: CstNode, errors: Vec<ParseError>) -> Self {
        Self { root, errors }
    }

    /// Check if parsing was successful (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// =============================================================================
// CST NODE
// =============================================================================

/// A node in the Concrete Syntax Tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CstNode {
    /// Node type.
    pub kind: NodeKind,
    /// Source span.
    pub span: Span,
    /// Field this node occupies in its parent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    /// Text content (for leaves like identifiers and numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child nodes, named and anonymous, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CstNode>,
}

impl CstNode {
    /// Create a new CST node.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            field: None,
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node with text content.
    pub fn with_text(kind: NodeKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(kind, span)
        }
    }

    /// Create node with children.
    pub fn with_children(kind: NodeKind, span: Span, children: Vec<CstNode>) -> Self {
        Self {
            children,
            ..Self::new(kind, span)
        }
    }

    /// Attach this node to a field of its parent.
    pub fn in_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: CstNode) {
        self.children.push(child);
    }

    /// Get text content, or empty string if none.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Symbol id of this node's kind in the grammar descriptor.
    pub fn kind_id(&self) -> u16 {
        // Every NodeKind has an entry in the descriptor's symbol table.
        tree_sitter_bst::language()
            .id_for_node_kind(self.kind.name(), self.kind.is_named())
            .unwrap_or_default()
    }

    /// Whether this node or any descendant is an `ERROR` node.
    pub fn has_error(&self) -> bool {
        self.kind == NodeKind::Error || self.children.iter().any(CstNode::has_error)
    }

    /// Named children only.
    pub fn named_children(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(|c| c.kind.is_named())
    }

    /// First child in the given field.
    pub fn child_by_field(&self, field: Field) -> Option<&CstNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// All children in the given field, in source order.
    pub fn children_by_field(&self, field: Field) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(move |c| c.field == Some(field))
    }

    /// Find first child with given kind.
    pub fn find_child(&self, kind: NodeKind) -> Option<&CstNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Find all children with given kind.
    pub fn find_children(&self, kind: NodeKind) -> Vec<&CstNode> {
        self.children.iter().filter(|c| c.kind == kind).collect()
    }

    /// Tree-sitter style S-expression of the named nodes, with field labels.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        let _ = write!(out, "({}", self.kind.name());
        for child in self.named_children() {
            out.push(' ');
            if let Some(field) = child.field {
                let _ = write!(out, "{}: ", field.name());
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl Spanned for CstNode {
    fn span(&self) -> Span {
        self.span
    }
}

// =============================================================================
// NODE KIND
// =============================================================================

/// Types of CST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // Top-level
    /// Root node containing all commands.
    SourceFile,
    /// `% ...` up to the end of the line.
    Comment,

    // Commands
    /// `ENTRY {fields} {integers} {strings}`
    Entry,
    /// `INTEGERS {names}`
    Integers,
    /// `STRINGS {names}`
    Strings,
    /// `MACRO {name} {"value"}`
    Macro,
    /// `FUNCTION {name} {body}`
    Function,
    /// `READ`
    Read,
    /// `EXECUTE {function}`
    Execute,
    /// `ITERATE {function}`
    Iterate,
    /// `REVERSE {function}`
    Reverse,
    /// `SORT`
    Sort,

    // Structure
    /// `{ id* }`
    IdList,
    /// `{ term* }`
    Block,

    // Terms
    /// `#-12`
    Integer,
    /// Digits of an integer, with optional sign.
    Number,
    /// `"text"`
    String,
    /// Text between the quotes of a string.
    StringContent,
    /// `'name`
    Ref,
    /// Plain identifier.
    Id,
    /// `= < > + - * :=`
    Operator,
    /// Name ending in `$`.
    Builtin,

    // Anonymous
    /// Command keyword as written.
    Keyword(Command),
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `#`
    Hash,
    /// `'`
    Quote,
    /// `"`
    DoubleQuote,

    /// Skipped input after a syntax error.
    #[serde(rename = "ERROR")]
    Error,
}

impl NodeKind {
    /// Node kind name as listed in the grammar descriptor.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SourceFile => "source_file",
            Self::Comment => "comment",
            Self::Entry => "entry",
            Self::Integers => "integers",
            Self::Strings => "strings",
            Self::Macro => "macro",
            Self::Function => "function",
            Self::Read => "read",
            Self::Execute => "execute",
            Self::Iterate => "iterate",
            Self::Reverse => "reverse",
            Self::Sort => "sort",
            Self::IdList => "id_list",
            Self::Block => "block",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::StringContent => "string_content",
            Self::Ref => "ref",
            Self::Id => "id",
            Self::Operator => "operator",
            Self::Builtin => "builtin",
            Self::Keyword(cmd) => cmd.keyword(),
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Hash => "#",
            Self::Quote => "'",
            Self::DoubleQuote => "\"",
            Self::Error => "ERROR",
        }
    }

    /// Named nodes are the ones with a grammar rule; the rest are literal
    /// tokens.
    pub const fn is_named(&self) -> bool {
        !matches!(
            self,
            Self::Keyword(_)
                | Self::LBrace
                | Self::RBrace
                | Self::Hash
                | Self::Quote
                | Self::DoubleQuote
        )
    }

    /// Node kind produced by a top-level command.
    pub const fn for_command(command: Command) -> Self {
        match command {
            Command::Entry => Self::Entry,
            Command::Execute => Self::Execute,
            Command::Function => Self::Function,
            Command::Integers => Self::Integers,
            Command::Iterate => Self::Iterate,
            Command::Macro => Self::Macro,
            Command::Read => Self::Read,
            Command::Reverse => Self::Reverse,
            Command::Sort => Self::Sort,
            Command::Strings => Self::Strings,
        }
    }

    /// Check if this is a top-level command node.
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::Entry
                | Self::Integers
                | Self::Strings
                | Self::Macro
                | Self::Function
                | Self::Read
                | Self::Execute
                | Self::Iterate
                | Self::Reverse
                | Self::Sort
        )
    }

    /// Check if this node can appear as a term inside a block.
    pub const fn is_term(&self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::String
                | Self::Ref
                | Self::Id
                | Self::Operator
                | Self::Builtin
                | Self::Block
        )
    }
}

// =============================================================================
// FIELD
// =============================================================================

/// Field names, matching the descriptor's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Body,
    Fields,
    Function,
    Integers,
    Name,
    Names,
    Strings,
    Symbol,
    Term,
    Value,
}

impl Field {
    /// Field name as listed in the grammar descriptor.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Fields => "fields",
            Self::Function => "function",
            Self::Integers => "integers",
            Self::Name => "name",
            Self::Names => "names",
            Self::Strings => "strings",
            Self::Symbol => "symbol",
            Self::Term => "term",
            Self::Value => "value",
        }
    }

    /// Field id in the grammar descriptor.
    pub fn id(&self) -> u16 {
        tree_sitter_bst::language()
            .field_id_for_name(self.name())
            .unwrap_or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================
