//! # Database
//!
//! Bibliography entries consumed by `READ`. Entries are supplied directly,
//! usually deserialized from JSON:
//!
//! ```json
//! {
//!   "preambles": ["\\newcommand{\\noop}[1]{}"],
//!   "entries": [
//!     { "key": "knuth84", "type": "book",
//!       "fields": { "author": "Donald E. Knuth", "year": "1984" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of entries plus `@PREAMBLE` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub preambles: Vec<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// One bibliography entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Citation key, returned by `cite$` as written.
    pub key: String,
    /// Entry type such as `article`; selects the function `call.type$` runs.
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Database {
    /// Parse a database from JSON and normalize its names.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let database: Database = serde_json::from_str(text)?;
        Ok(database.normalized())
    }

    /// Lower-case entry types and field names; BST names are case-insensitive.
    pub fn normalized(mut self) -> Self {
        for entry in &mut self.entries {
            entry.entry_type = entry.entry_type.to_lowercase();
            entry.fields = std::mem::take(&mut entry.fields)
                .into_iter()
                .map(|(name, value)| (name.to_lowercase(), value))
                .collect();
        }
        self
    }

    /// All preambles joined, as pushed by `preamble$`.
    pub fn preamble(&self) -> String {
        self.preambles.concat()
    }

    /// Entry with the given key, compared case-insensitively.
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
    }
}

impl Entry {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }

    /// Field value, looking through `crossref` into `database` when absent.
    pub fn field<'a>(&'a self, name: &str, database: &'a Database) -> Option<&'a str> {
        if let Some(value) = self.fields.get(name) {
            return Some(value);
        }
        let parent = database.find(self.fields.get(tree_sitter_bst::CROSSREF_FIELD)?)?;
        if std::ptr::eq(parent, self) {
            return None;
        }
        parent.fields.get(name).map(String::as_str)
    }
}
