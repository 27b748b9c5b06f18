//! # Grammar Descriptor
//!
//! Immutable tables describing the BST language: node kinds, field names,
//! command keywords, operators and built-in functions.
//!
//! The descriptor is built exactly once (see [`crate::language`]) and then
//! only read. Symbol and field ids follow the tree-sitter conventions: symbol
//! `0` is the end-of-input symbol and field ids start at `1`.

use config::constants::{FILE_EXTENSIONS, GRAMMAR_ABI_VERSION, GRAMMAR_NAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// STATIC TABLES
// =============================================================================

/// Named node kinds, in symbol id order (ids start at 1).
const NAMED_KINDS: &[&str] = &[
    "source_file",
    "comment",
    "entry",
    "integers",
    "strings",
    "macro",
    "function",
    "read",
    "execute",
    "iterate",
    "reverse",
    "sort",
    "id_list",
    "block",
    "integer",
    "number",
    "string",
    "string_content",
    "ref",
    "id",
    "operator",
    "builtin",
    "ERROR",
];

/// Anonymous node kinds (punctuation), following the named kinds.
const PUNCTUATION: &[&str] = &["{", "}", "#", "'", "\""];

/// Field names, sorted. Field ids start at 1.
const FIELDS: &[&str] = &[
    "body",
    "fields",
    "function",
    "integers",
    "name",
    "names",
    "strings",
    "symbol",
    "term",
    "value",
];

const OPERATORS: &[&str] = &["=", "<", ">", "+", "-", "*", ":="];

/// BibTeX 0.99d built-in functions.
const BUILTINS: &[&str] = &[
    "add.period$",
    "call.type$",
    "change.case$",
    "chr.to.int$",
    "cite$",
    "duplicate$",
    "empty$",
    "format.name$",
    "if$",
    "int.to.chr$",
    "int.to.str$",
    "missing$",
    "newline$",
    "num.names$",
    "pop$",
    "preamble$",
    "purify$",
    "quote$",
    "skip$",
    "stack$",
    "substring$",
    "swap$",
    "text.length$",
    "text.prefix$",
    "top$",
    "type$",
    "warning$",
    "while$",
    "width$",
    "write$",
];

/// Built-in integer variables.
const INTEGER_VARIABLES: &[&str] = &["entry.max$", "global.max$"];

/// Built-in entry string variable used by `SORT`.
pub const SORT_KEY: &str = "sort.key$";

/// Field implicitly declared for every entry.
pub const CROSSREF_FIELD: &str = "crossref";

// =============================================================================
// COMMAND
// =============================================================================

/// Top-level commands of a style file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Entry,
    Execute,
    Function,
    Integers,
    Iterate,
    Macro,
    Read,
    Reverse,
    Sort,
    Strings,
}

impl Command {
    /// All commands in keyword order.
    pub const ALL: [Command; 10] = [
        Command::Entry,
        Command::Execute,
        Command::Function,
        Command::Integers,
        Command::Iterate,
        Command::Macro,
        Command::Read,
        Command::Reverse,
        Command::Sort,
        Command::Strings,
    ];

    /// Canonical (upper case) keyword.
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Entry => "ENTRY",
            Self::Execute => "EXECUTE",
            Self::Function => "FUNCTION",
            Self::Integers => "INTEGERS",
            Self::Iterate => "ITERATE",
            Self::Macro => "MACRO",
            Self::Read => "READ",
            Self::Reverse => "REVERSE",
            Self::Sort => "SORT",
            Self::Strings => "STRINGS",
        }
    }

    /// Name of the named node kind a command produces.
    pub const fn node_kind(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Execute => "execute",
            Self::Function => "function",
            Self::Integers => "integers",
            Self::Iterate => "iterate",
            Self::Macro => "macro",
            Self::Read => "read",
            Self::Reverse => "reverse",
            Self::Sort => "sort",
            Self::Strings => "strings",
        }
    }
}

// =============================================================================
// SYMBOL
// =============================================================================

/// Metadata for one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    /// Symbol id.
    pub id: u16,
    /// Node kind name.
    #[serde(rename = "type")]
    pub name: &'static str,
    /// Named nodes are the ones a tree consumer normally looks at.
    pub named: bool,
}

/// Serializable view of the descriptor tables.
#[derive(Debug, Clone, Serialize)]
pub struct NodeTypes<'a> {
    pub name: &'a str,
    pub abi_version: u32,
    pub symbols: &'a [SymbolInfo],
    pub fields: Vec<FieldInfo<'a>>,
}

/// Metadata for one field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldInfo<'a> {
    pub id: u16,
    pub name: &'a str,
}

// =============================================================================
// GRAMMAR
// =============================================================================

/// The grammar descriptor.
///
/// Fields are private: consumers only get read-only queries, so the layout
/// can change without touching hosts.
#[derive(Debug)]
pub struct Grammar {
    name: &'static str,
    abi_version: u32,
    symbols: Vec<SymbolInfo>,
    field_index: HashMap<&'static str, u16>,
    commands: HashMap<&'static str, Command>,
}

impl Grammar {
    /// Builds the descriptor tables. Only called through the one-time
    /// initializer in [`crate::language`].
    pub(crate) fn build() -> Self {
        let mut symbols = Vec::with_capacity(1 + NAMED_KINDS.len() + Command::ALL.len() + PUNCTUATION.len());
        symbols.push(SymbolInfo { id: 0, name: "end", named: false });

        let named = NAMED_KINDS.iter().map(|name| (*name, true));
        let keywords = Command::ALL.iter().map(|cmd| (cmd.keyword(), false));
        let punctuation = PUNCTUATION.iter().map(|name| (*name, false));
        for (name, is_named) in named.chain(keywords).chain(punctuation) {
            let id = symbols.len() as u16;
            symbols.push(SymbolInfo { id, name, named: is_named });
        }

        let field_index = FIELDS
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i as u16 + 1))
            .collect();

        let commands = Command::ALL.iter().map(|cmd| (cmd.keyword(), *cmd)).collect();

        let grammar = Self {
            name: GRAMMAR_NAME,
            abi_version: GRAMMAR_ABI_VERSION,
            symbols,
            field_index,
            commands,
        };

        tracing::debug!(
            name = grammar.name,
            symbols = grammar.symbol_count(),
            fields = grammar.field_count(),
            "initialized grammar descriptor"
        );

        grammar
    }

    /// Language name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptor layout version.
    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// File extensions for this language, without the dot.
    pub fn file_extensions(&self) -> &'static [&'static str] {
        FILE_EXTENSIONS
    }

    // =========================================================================
    // SYMBOLS
    // =========================================================================

    /// Number of node kinds, including the end symbol.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Name of the node kind with the given id.
    pub fn symbol_name(&self, id: u16) -> Option<&'static str> {
        self.symbols.get(id as usize).map(|info| info.name)
    }

    /// Whether the node kind with the given id is named.
    pub fn symbol_is_named(&self, id: u16) -> bool {
        self.symbols.get(id as usize).is_some_and(|info| info.named)
    }

    /// Id of a node kind by name. Returns `None` for unknown kinds.
    ///
    /// ```
    /// let grammar = tree_sitter_bst::language();
    /// let id = grammar.id_for_node_kind("function", true).unwrap();
    /// assert_eq!(grammar.symbol_name(id), Some("function"));
    /// ```
    pub fn id_for_node_kind(&self, kind: &str, named: bool) -> Option<u16> {
        self.symbols
            .iter()
            .find(|info| info.name == kind && info.named == named)
            .map(|info| info.id)
    }

    /// All symbols in id order.
    pub fn symbols(&self) -> &[SymbolInfo] {
        &self.symbols
    }

    // =========================================================================
    // FIELDS
    // =========================================================================

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        FIELDS.len()
    }

    /// Name of the field with the given id (ids start at 1).
    pub fn field_name_for_id(&self, id: u16) -> Option<&'static str> {
        let index = (id as usize).checked_sub(1)?;
        FIELDS.get(index).copied()
    }

    /// Id of a field by name.
    pub fn field_id_for_name(&self, name: &str) -> Option<u16> {
        self.field_index.get(name).copied()
    }

    // =========================================================================
    // LEXICAL CLASSES
    // =========================================================================

    /// Looks up a command keyword. BibTeX treats commands case-insensitively.
    pub fn command(&self, word: &str) -> Option<Command> {
        if word.len() > "INTEGERS".len() {
            return None;
        }
        self.commands.get(word.to_ascii_uppercase().as_str()).copied()
    }

    /// Whether `text` is one of the operator functions.
    pub fn is_operator(&self, text: &str) -> bool {
        OPERATORS.contains(&text)
    }

    /// Operator functions.
    pub fn operators(&self) -> &'static [&'static str] {
        OPERATORS
    }

    /// Whether `text` names a built-in function.
    pub fn is_builtin(&self, text: &str) -> bool {
        BUILTINS.binary_search(&text).is_ok()
    }

    /// Built-in function names, sorted.
    pub fn builtins(&self) -> &'static [&'static str] {
        BUILTINS
    }

    /// Built-in integer variables.
    pub fn integer_variables(&self) -> &'static [&'static str] {
        INTEGER_VARIABLES
    }

    /// Serializable view of the node-kind and field tables.
    pub fn node_types(&self) -> NodeTypes<'_> {
        NodeTypes {
            name: self.name,
            abi_version: self.abi_version,
            symbols: &self.symbols,
            fields: FIELDS
                .iter()
                .enumerate()
                .map(|(i, name)| FieldInfo { id: i as u16 + 1, name })
                .collect(),
        }
    }

    /// The node-kind and field tables rendered as pretty JSON.
    pub fn node_types_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.node_types())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_builtins_are_sorted_for_binary_search() {
        let mut sorted = BUILTINS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, BUILTINS);
    }

    #[test]
    fn test_builtins_end_with_dollar() {
        assert!(BUILTINS.iter().all(|name| name.ends_with('$')));
    }

    #[test]
    fn test_fields_are_sorted() {
        let mut sorted = FIELDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, FIELDS);
    }

    #[test]
    fn test_symbol_ids_match_positions() {
        let grammar = Grammar::build();
        for (i, info) in grammar.symbols().iter().enumerate() {
            assert_eq!(info.id as usize, i);
        }
        assert_eq!(grammar.symbol_name(0), Some("end"));
    }

    #[test]
    fn test_symbol_round_trip() {
        let grammar = Grammar::build();
        for kind in NAMED_KINDS {
            let id = grammar.id_for_node_kind(kind, true).expect("named kind");
            assert_eq!(grammar.symbol_name(id), Some(*kind));
            assert!(grammar.symbol_is_named(id));
        }
        let brace = grammar.id_for_node_kind("{", false).expect("punctuation");
        assert!(!grammar.symbol_is_named(brace));
        assert_eq!(grammar.id_for_node_kind("{", true), None);
    }

    #[test]
    fn test_field_ids_start_at_one() {
        let grammar = Grammar::build();
        assert_eq!(grammar.field_name_for_id(0), None);
        assert_eq!(grammar.field_name_for_id(1), Some("body"));
        assert_eq!(grammar.field_id_for_name("value"), Some(FIELDS.len() as u16));
        assert_eq!(grammar.field_id_for_name("nope"), None);
    }

    #[rstest]
    #[case("FUNCTION", Some(Command::Function))]
    #[case("function", Some(Command::Function))]
    #[case("Execute", Some(Command::Execute))]
    #[case("read", Some(Command::Read))]
    #[case("FUNCTIONS", None)]
    #[case("skip$", None)]
    fn test_command_lookup(#[case] word: &str, #[case] expected: Option<Command>) {
        assert_eq!(Grammar::build().command(word), expected);
    }

    #[test]
    fn test_lexical_classes() {
        let grammar = Grammar::build();
        assert!(grammar.is_operator(":="));
        assert!(!grammar.is_operator("=="));
        assert!(grammar.is_builtin("if$"));
        assert!(!grammar.is_builtin("if"));
        assert_eq!(grammar.integer_variables(), &["entry.max$", "global.max$"]);
    }

    #[test]
    fn test_node_types_json_lists_every_symbol() {
        let grammar = Grammar::build();
        let json = grammar.node_types_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "bst");
        assert_eq!(
            value["symbols"].as_array().unwrap().len(),
            grammar.symbol_count()
        );
        assert_eq!(value["fields"][0]["name"], "body");
    }
}
