//! # Config Crate
//!
//! Centralized configuration constants for the BST toolchain.
//! All magic numbers and tunable limits are defined here so that the
//! grammar, parser, lowering and interpreter crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GRAMMAR_NAME, MAX_CALL_DEPTH, Limits};
//!
//! assert_eq!(GRAMMAR_NAME, "bst");
//!
//! let limits = Limits::default();
//! assert_eq!(limits.max_call_depth, MAX_CALL_DEPTH);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **BibTeX Compatible**: Built-in variable values match BibTeX 0.99d
//! - **No Dependencies**: Pure constants and a validated limits snapshot

pub mod constants;

#[cfg(test)]
mod tests;
