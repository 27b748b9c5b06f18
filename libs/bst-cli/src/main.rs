//! `bst` binary.

use anyhow::Result;
use bst_cli::cli::{Cli, Command};
use bst_cli::commands::{self, LimitOverrides};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Command::Parse { file } => println!("{}", commands::parse(&file)?),
        Command::Lower { files } => print!("{}", commands::lower(&files)?),
        Command::Run {
            file,
            database,
            max_call_depth,
            max_stack_size,
            max_while_iterations,
        } => {
            let limits = LimitOverrides {
                max_call_depth,
                max_stack_size,
                max_while_iterations,
            };
            let report = commands::run(&file, database.as_deref(), limits)?;
            print!("{}", report.output);
            for message in &report.messages {
                eprintln!("{}", message);
            }
            for warning in &report.warnings {
                eprintln!("Warning--{}", warning);
            }
        }
        Command::Grammar => println!("{}", commands::grammar()?),
    }

    Ok(())
}

/// Logs go to stderr; `-v` forces DEBUG, otherwise `RUST_LOG` or WARN.
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
