//! CLI schema for the `bst` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "bst")]
#[command(about = "Tools for BibTeX style (.bst) files")]
#[command(version)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the concrete syntax tree as JSON
    Parse {
        /// Style file to parse
        file: PathBuf,
    },
    /// Print the inferred stack effect of every function
    Lower {
        /// Style files, processed in parallel and reported in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Run a style and print what it writes
    Run {
        /// Style file to run
        file: PathBuf,

        /// JSON database of entries read by READ
        #[arg(short, long, value_name = "JSON")]
        database: Option<PathBuf>,

        /// Maximum nesting of function calls
        #[arg(long, value_name = "N")]
        max_call_depth: Option<usize>,

        /// Maximum operand stack size
        #[arg(long, value_name = "N")]
        max_stack_size: Option<usize>,

        /// Maximum iterations of a single while$ loop
        #[arg(long, value_name = "N")]
        max_while_iterations: Option<usize>,
    },
    /// Print the grammar descriptor's node types as JSON
    Grammar,
}
