//! # BST CLI
//!
//! Library half of the `bst` binary: the argument schema and the
//! subcommand implementations, kept here so integration tests can call them.

pub mod cli;
pub mod commands;
